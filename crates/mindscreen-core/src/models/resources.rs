use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum EmergencyKind {
    CrisisLine,
    TextSupport,
    ChatSupport,
    EmergencyServices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmergencyResource {
    pub name: String,
    pub phone: String,
    pub description: String,
    pub availability: String,
    pub kind: EmergencyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ProviderKind {
    Clinic,
    Hospital,
    PrivatePractice,
}

/// A provider as returned by the location lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicalProvider {
    pub name: String,
    pub kind: ProviderKind,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub rating: Option<f32>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResourceSource {
    ChatCompletionApi,
    Fallback,
}

/// Output of the location resource pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocationResources {
    pub emergency_resources: Vec<EmergencyResource>,
    pub medical_providers: Vec<MedicalProvider>,
    pub source: ResourceSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProfessionalKind {
    Psychiatrist,
    Psychologist,
    Therapist,
    Counselor,
    Clinic,
    Hospital,
}

impl From<ProviderKind> for ProfessionalKind {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Clinic => ProfessionalKind::Clinic,
            ProviderKind::Hospital => ProfessionalKind::Hospital,
            ProviderKind::PrivatePractice => ProfessionalKind::Therapist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfessionalProvider {
    pub name: String,
    pub kind: ProfessionalKind,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
    pub rating: Option<f32>,
    pub specialties: Vec<String>,
}

impl From<MedicalProvider> for ProfessionalProvider {
    fn from(p: MedicalProvider) -> Self {
        let description = p.description.to_lowercase();
        let specialty = if description.contains("depression") {
            "Depression"
        } else if description.contains("anxiety") {
            "Anxiety"
        } else {
            "General Mental Health"
        };
        ProfessionalProvider {
            name: p.name,
            kind: p.kind.into(),
            address: p.address,
            phone: p.phone,
            website: p.website,
            rating: p.rating,
            specialties: vec![specialty.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum OnlineResourceKind {
    Article,
    Video,
    App,
    Course,
    SupportGroup,
    Podcast,
    Book,
}

impl OnlineResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnlineResourceKind::Article => "article",
            OnlineResourceKind::Video => "video",
            OnlineResourceKind::App => "app",
            OnlineResourceKind::Course => "course",
            OnlineResourceKind::SupportGroup => "support group",
            OnlineResourceKind::Podcast => "podcast",
            OnlineResourceKind::Book => "book",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResourceCost {
    Free,
    Paid,
    Freemium,
}

impl ResourceCost {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCost::Free => "free",
            ResourceCost::Paid => "paid",
            ResourceCost::Freemium => "freemium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResourceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A self-guided resource that does not depend on the user's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OnlineResource {
    pub title: String,
    pub url: String,
    pub kind: OnlineResourceKind,
    pub description: String,
    pub cost: Option<ResourceCost>,
    pub rating: Option<f32>,
    pub level: Option<ResourceLevel>,
}

/// Resources attached to a composite result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfessionalResources {
    pub local_providers: Vec<ProfessionalProvider>,
    pub online_resources: Vec<OnlineResource>,
    pub emergency_resources: Vec<EmergencyResource>,
    /// Source of the location-dependent lists.
    pub source: ResourceSource,
}

impl ProfessionalResources {
    /// Combine the location pipeline's output with the instrument's online
    /// resources.
    pub fn from_location(r: LocationResources, online_resources: Vec<OnlineResource>) -> Self {
        ProfessionalResources {
            local_providers: r.medical_providers.into_iter().map(Into::into).collect(),
            online_resources,
            emergency_resources: r.emergency_resources,
            source: r.source,
        }
    }
}

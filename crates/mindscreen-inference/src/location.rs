//! Location-based support resources.
//!
//! Runs the same resilient completion pipeline as the analysis path with a
//! location prompt, and falls back to a country-keyed static list when the
//! lookup fails or yields nothing usable.

use mindscreen_core::models::resources::{
    EmergencyKind, EmergencyResource, LocationResources, MedicalProvider, ProviderKind,
    ResourceSource,
};
use mindscreen_core::models::user::Location;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::chat::ChatMessage;
use crate::client::ResilientClient;
use crate::error::InferenceError;
use crate::normalize::locate_object;

/// Which resource lists to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceScope {
    Emergency,
    Medical,
    #[default]
    Both,
}

impl ResourceScope {
    fn emergency(&self) -> bool {
        matches!(self, ResourceScope::Emergency | ResourceScope::Both)
    }

    fn medical(&self) -> bool {
        matches!(self, ResourceScope::Medical | ResourceScope::Both)
    }
}

const LOCATION_SYSTEM_PROMPT: &str = "\
You find real mental health resources for specific geographic locations. \
Provide existing services with actual phone numbers, addresses and facility names. \
Focus on mental health services, covering both crisis resources and ongoing care. \
Include local emergency numbers and national backup numbers. \
Consider the regional healthcare system and cultural context. \
Where local resources are limited, give the best available options plus national alternatives. \
Respond with a single JSON object in exactly the requested structure and no other text.";

pub fn location_prompt(location: &Location, scope: ResourceScope) -> String {
    let Location { country, city, .. } = location;
    let mut prompt = format!(
        "I need specific mental health resources for someone located in {city}, {country}.\n\nPlease provide:\n"
    );
    if scope.emergency() {
        prompt.push_str(
            "\nEMERGENCY CONTACTS (3-5 items):\n\
             - Crisis hotlines with actual phone numbers\n\
             - Suicide prevention services\n\
             - Emergency mental health services\n\
             - Both local and national numbers where available\n",
        );
    }
    if scope.medical() {
        prompt.push_str(&format!(
            "\nMEDICAL CENTERS (3-5 items):\n\
             - Mental health clinics in {city}\n\
             - Hospitals with psychiatric services\n\
             - Community health centers\n\
             - Private practice mental health providers\n\
             - Actual names, addresses and contact information where possible\n"
        ));
    }
    prompt.push_str(&format!(
        r#"
Format your response as JSON matching this structure:
{{
  "emergencyResources": [
    {{"name": "", "phone": "", "description": "", "availability": "", "type": "crisis-line|emergency-services|text-support"}}
  ],
  "medicalProviders": [
    {{"name": "", "type": "clinic|hospital|private-practice", "address": "address in {city}", "phone": "", "description": "services and specialties", "rating": 4.2, "website": ""}}
  ]
}}"#
    ));
    prompt
}

/// Country-keyed static resources.
pub fn fallback_resources(location: &Location) -> LocationResources {
    let resource = |name: &str, phone: &str, description: &str, kind: EmergencyKind| {
        EmergencyResource {
            name: name.to_string(),
            phone: phone.to_string(),
            description: description.to_string(),
            availability: "24/7".to_string(),
            kind,
        }
    };

    let emergency_resources = match location.country.as_str() {
        "United States" => vec![
            resource(
                "988 Suicide & Crisis Lifeline",
                "988",
                "24/7 crisis support and suicide prevention",
                EmergencyKind::CrisisLine,
            ),
            resource(
                "Crisis Text Line",
                "Text HOME to 741741",
                "Free, confidential crisis support via text",
                EmergencyKind::TextSupport,
            ),
        ],
        "Pakistan" => vec![
            resource(
                "Rescue 1122",
                "1122",
                "Emergency rescue and medical services",
                EmergencyKind::EmergencyServices,
            ),
            resource(
                "Mental Health Helpline",
                "1166",
                "Mental health crisis support",
                EmergencyKind::CrisisLine,
            ),
        ],
        _ => vec![EmergencyResource {
            name: "Local Emergency Services".to_string(),
            phone: "Contact local emergency services".to_string(),
            description: "Reach out to local mental health crisis services".to_string(),
            availability: "Varies by location".to_string(),
            kind: EmergencyKind::EmergencyServices,
        }],
    };

    LocationResources {
        emergency_resources,
        medical_providers: vec![MedicalProvider {
            name: format!("Mental Health Services - {}", location.city),
            kind: ProviderKind::Clinic,
            address: format!("{}, {}", location.city, location.country),
            phone: "Contact local directory".to_string(),
            description: "Local mental health clinic services".to_string(),
            rating: None,
            website: None,
        }],
        source: ResourceSource::Fallback,
    }
}

/// Parse a location response. Entries missing a name are dropped.
pub fn parse_resources(raw: &str) -> Result<LocationResources, InferenceError> {
    let root = locate_object(raw).ok_or(InferenceError::UnparsableResponse)?;
    let list = |keys: &[&str]| -> Vec<Map<String, Value>> {
        keys.iter()
            .find_map(|k| root.get(*k).and_then(Value::as_array))
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    };

    let emergency_resources = list(&["emergencyResources", "emergency_resources"])
        .iter()
        .filter_map(emergency_resource)
        .collect();
    let medical_providers = list(&["medicalProviders", "medical_providers"])
        .iter()
        .filter_map(medical_provider)
        .collect();

    Ok(LocationResources {
        emergency_resources,
        medical_providers,
        source: ResourceSource::ChatCompletionApi,
    })
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn emergency_resource(obj: &Map<String, Value>) -> Option<EmergencyResource> {
    let kind = match text(obj, "type").unwrap_or_default().to_lowercase() {
        k if k.contains("text") => EmergencyKind::TextSupport,
        k if k.contains("chat") => EmergencyKind::ChatSupport,
        k if k.contains("emergency") => EmergencyKind::EmergencyServices,
        _ => EmergencyKind::CrisisLine,
    };
    Some(EmergencyResource {
        name: text(obj, "name")?,
        phone: text(obj, "phone").unwrap_or_default(),
        description: text(obj, "description").unwrap_or_default(),
        availability: text(obj, "availability").unwrap_or_else(|| "Varies".to_string()),
        kind,
    })
}

fn medical_provider(obj: &Map<String, Value>) -> Option<MedicalProvider> {
    let kind = match text(obj, "type").unwrap_or_default().to_lowercase() {
        k if k.contains("hospital") => ProviderKind::Hospital,
        k if k.contains("private") => ProviderKind::PrivatePractice,
        _ => ProviderKind::Clinic,
    };
    Some(MedicalProvider {
        name: text(obj, "name")?,
        kind,
        address: text(obj, "address").unwrap_or_default(),
        phone: text(obj, "phone").unwrap_or_default(),
        description: text(obj, "description").unwrap_or_default(),
        rating: obj.get("rating").and_then(Value::as_f64).map(|r| r as f32),
        website: text(obj, "website"),
    })
}

/// Location resource lookup over a resilient client.
#[derive(Debug, Clone)]
pub struct LocationService {
    client: ResilientClient,
}

impl LocationService {
    pub fn new(client: ResilientClient) -> Self {
        Self { client }
    }

    /// Ask the model for resources. Errors are returned, not masked.
    pub async fn lookup(
        &self,
        location: &Location,
        scope: ResourceScope,
    ) -> Result<LocationResources, InferenceError> {
        let messages = vec![
            ChatMessage::system(LOCATION_SYSTEM_PROMPT),
            ChatMessage::user(location_prompt(location, scope)),
        ];
        let completion = self.client.complete(&messages).await?;
        let mut resources = parse_resources(&completion.text)?;
        if !scope.emergency() {
            resources.emergency_resources.clear();
        }
        if !scope.medical() {
            resources.medical_providers.clear();
        }
        Ok(resources)
    }

    /// Resources for `location`, never failing: lookup errors and empty
    /// answers fall back to the static list.
    pub async fn resources(&self, location: &Location, scope: ResourceScope) -> LocationResources {
        match self.lookup(location, scope).await {
            Ok(found)
                if !found.emergency_resources.is_empty() || !found.medical_providers.is_empty() =>
            {
                info!(
                    country = %location.country,
                    city = %location.city,
                    emergency = found.emergency_resources.len(),
                    providers = found.medical_providers.len(),
                    "location resources retrieved"
                );
                found
            }
            Ok(_) => {
                warn!(
                    country = %location.country,
                    "location lookup returned no resources, using fallback"
                );
                fallback_resources(location)
            }
            Err(e) => {
                warn!(
                    country = %location.country,
                    error = %e,
                    "location lookup failed, using fallback"
                );
                fallback_resources(location)
            }
        }
    }
}

pub mod assessment;
pub mod education;
pub mod insights;
pub mod resources;
pub mod response;
pub mod risk;
pub mod scored;
pub mod user;

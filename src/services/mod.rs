pub mod beneficiary_service;
pub mod campaign_service;
pub mod collection_point_service;
pub mod distribution_service;
pub mod donation_service;
pub mod donor_service;
pub mod stats_service;
pub mod volunteer_service;

pub use beneficiary_service::BeneficiaryService;
pub use campaign_service::CampaignService;
pub use collection_point_service::CollectionPointService;
pub use distribution_service::DistributionService;
pub use donation_service::{DonationService, validate_donation};
pub use donor_service::DonorService;
pub use stats_service::StatsService;
pub use volunteer_service::VolunteerService;

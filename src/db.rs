pub mod user_repo;
pub use user_repo::UserRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod indication_repo;
pub use indication_repo::IndicationRepository;
pub mod page_repo;
pub use page_repo::PageRepository;
pub mod quiz_repo;
pub use quiz_repo::QuizRepository;
pub mod outbound_repo;
pub use outbound_repo::OutboundRepository;
pub mod interest_repo;
pub use interest_repo::InterestRepository;
pub mod cycle_repo;
pub use cycle_repo::CycleRepository;
pub mod dre_repo;
pub use dre_repo::DreRepository;

#[cfg(test)]
pub mod test_support;

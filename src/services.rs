pub mod auth;
pub mod pipeline;
pub mod lead_service;
pub mod indication_service;
pub mod page_service;
pub mod quiz_service;
pub mod outbound_service;
pub mod cycle_service;
pub mod dre_service;

pub mod auth;
pub mod cycle;
pub mod dre;
pub mod event;
pub mod indication;
pub mod interest;
pub mod lead;
pub mod outbound;
pub mod page;
pub mod pipeline;
pub mod quiz;

pub mod debounce;
pub mod state;

pub use debounce::{Debouncer, DOCTOR_SEARCH_DELAY};
pub use state::{DashboardStore, PanelState};

//! Client-side shared state for the dashboard: the current filter, the
//! fetched appointment list, and the UI toggles. This is an explicit store
//! object handed to whatever renders it; there is no process-wide global.
//!
//! Fetching is modelled as begin/complete pairs with a monotonically
//! increasing sequence number, so a response that arrives after a newer
//! fetch was issued is discarded instead of overwriting fresher data.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::models::{AppointmentStatus, AppointmentView, DoctorProfile};
use crate::query::{
    clamp_page, page_slice, total_pages, FilterCriteria, StatusFilter, DEFAULT_PAGE_SIZE,
    PAGE_SIZES,
};

/// The add/edit panel: closed, open on a blank record, or open prefilled
/// with an existing appointment. Cancel, successful save and
/// outside-dismiss all land back on `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    New,
    Editing(Uuid),
}

#[derive(Debug)]
pub struct DashboardStore {
    filter: FilterCriteria,
    appointments: Vec<AppointmentView>,
    doctors: Vec<DoctorProfile>,
    sidebar_open: bool,
    panel: PanelState,
    page: usize,
    page_size: usize,
    fetch_needed: bool,
    latest_fetch: u64,
    submit_in_flight: bool,
}

impl DashboardStore {
    /// A fresh dashboard seeds the date window to [today, today+7] and
    /// wants an initial fetch.
    pub fn new(today: NaiveDate) -> Self {
        let filter = FilterCriteria {
            search: None,
            status: StatusFilter::All,
            start_date: Some(today),
            end_date: today.checked_add_days(Days::new(7)),
        };
        DashboardStore {
            filter,
            appointments: Vec::new(),
            doctors: Vec::new(),
            sidebar_open: false,
            panel: PanelState::Closed,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            fetch_needed: true,
            latest_fetch: 0,
            submit_in_flight: false,
        }
    }

    /* ---- filter mutations: each one marks a re-fetch ---- */

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.filter.search = if term.is_empty() { None } else { Some(term) };
        self.filter_changed();
    }

    pub fn set_status(&mut self, status: Option<AppointmentStatus>) {
        self.filter.status = match status {
            Some(s) => StatusFilter::Only(s),
            None => StatusFilter::All,
        };
        self.filter_changed();
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filter.start_date = start;
        self.filter.end_date = end;
        self.filter_changed();
    }

    pub fn reset_filter(&mut self, today: NaiveDate) {
        self.filter = FilterCriteria {
            search: None,
            status: StatusFilter::All,
            start_date: Some(today),
            end_date: today.checked_add_days(Days::new(7)),
        };
        self.filter_changed();
    }

    fn filter_changed(&mut self) {
        self.page = 1;
        self.fetch_needed = true;
    }

    /* ---- fetch sequencing ---- */

    pub fn fetch_needed(&self) -> bool {
        self.fetch_needed
    }

    /// Issue a fetch: returns its sequence number and clears the dirty
    /// flag. The caller sends `filter().query_pairs()` to the server.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_needed = false;
        self.latest_fetch += 1;
        self.latest_fetch
    }

    /// Apply a fetch response. Returns false (and changes nothing) when a
    /// newer fetch was issued since `seq` — the stale response loses.
    pub fn complete_fetch(&mut self, seq: u64, rows: Vec<AppointmentView>) -> bool {
        if seq != self.latest_fetch {
            return false;
        }
        self.appointments = rows;
        true
    }

    pub fn appointments(&self) -> &[AppointmentView] {
        &self.appointments
    }

    pub fn set_doctors(&mut self, doctors: Vec<DoctorProfile>) {
        self.doctors = doctors;
    }

    pub fn doctors(&self) -> &[DoctorProfile] {
        &self.doctors
    }

    /* ---- pagination: pure slicing, never a re-fetch ---- */

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.appointments.len(), self.page_size)
    }

    /// Change the page size; invalid sizes are ignored. Any accepted
    /// change resets to page 1.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.appointments.len(), self.page_size);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn visible_page(&self) -> &[AppointmentView] {
        page_slice(&self.appointments, self.page, self.page_size)
    }

    /* ---- UI toggles ---- */

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    /* ---- add/edit panel ---- */

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn open_new(&mut self) {
        self.panel = PanelState::New;
    }

    pub fn open_edit(&mut self, id: Uuid) {
        self.panel = PanelState::Editing(id);
    }

    /// Cancel, successful save and outside-dismiss all close the panel.
    pub fn close_panel(&mut self) {
        self.panel = PanelState::Closed;
    }

    /* ---- submit guard ---- */

    /// Claim the in-flight slot for a form submission. A second submit
    /// while one is outstanding is refused.
    pub fn begin_submit(&mut self) -> bool {
        if self.submit_in_flight {
            return false;
        }
        self.submit_in_flight = true;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submit_in_flight = false;
    }
}

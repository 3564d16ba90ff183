//! Filter criteria, role scoping and pagination for the appointment list.
//!
//! Filtering is conjunctive: every supplied criterion must hold, absent
//! criteria impose no constraint. Role scoping is applied on top of the
//! criteria, never instead of them. Pagination is a pure slice over the
//! already-filtered set; it never goes back to the store.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Role, SessionUser};

pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Status constraint: `All` matches everything (the "all" dropdown entry
/// and an absent query param), `Only` matches one status exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Parse the `status` query param; `None` and `"all"` are unconstrained.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None | Some("all") => Ok(StatusFilter::All),
            Some(s) => s.parse().map(StatusFilter::Only),
        }
    }
}

/// The transient filter held by the dashboard and sent on every fetch.
/// Date bounds are whole days, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Lower bound as a timestamp: start of the start day.
    pub fn start_bound(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }

    /// Upper bound as a timestamp: end of the end day (inclusive range).
    pub fn end_bound(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .map(|d| d.and_hms_opt(23, 59, 59).unwrap().and_utc())
    }

    /// Conjunction of name substring (case-insensitive), status equality
    /// and time-in-range.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(term) = self.search.as_deref() {
            if !term.is_empty()
                && !appointment.name.to_lowercase().contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if !self.status.matches(appointment.status) {
            return false;
        }
        if let Some(start) = self.start_bound() {
            if appointment.time < start {
                return false;
            }
        }
        if let Some(end) = self.end_bound() {
            if appointment.time > end {
                return false;
            }
        }
        true
    }

    /// Query-string pairs for the dashboard fetch, mirroring the shape the
    /// server parses back out of `GET /api/appointments`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let StatusFilter::Only(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(d) = self.start_date {
            pairs.push(("startDate", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.end_date {
            pairs.push(("endDate", d.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Visibility scope derived from the verified session claims, never from
/// request input. Applied before the other filters combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Admin,
    Doctor(Uuid),
}

impl Scope {
    pub fn of(user: &SessionUser) -> Self {
        match user.role {
            Role::Admin => Scope::Admin,
            Role::Doctor => Scope::Doctor(user.id),
        }
    }

    pub fn permits(&self, appointment: &Appointment) -> bool {
        match self {
            Scope::Admin => true,
            Scope::Doctor(id) => appointment.doctor_id == *id,
        }
    }

    pub fn doctor_id(&self) -> Option<Uuid> {
        match self {
            Scope::Admin => None,
            Scope::Doctor(id) => Some(*id),
        }
    }
}

/// Total page count over `len` items. An empty set still renders one
/// (empty) page.
pub fn total_pages(len: usize, size: usize) -> usize {
    debug_assert!(size > 0);
    len.div_ceil(size).max(1)
}

/// Clamp a requested 1-based page into the valid range for `len` items.
pub fn clamp_page(page: usize, len: usize, size: usize) -> usize {
    page.clamp(1, total_pages(len, size))
}

/// The contiguous slice `[(page-1)*size, page*size)` of the filtered set.
/// Out-of-range pages clamp to the nearest boundary rather than erroring.
pub fn page_slice<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let page = clamp_page(page, items.len(), size);
    let start = (page - 1) * size;
    let end = (start + size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, Gender};
    use chrono::TimeZone;

    fn appointment(name: &str, status: AppointmentStatus, day: u32, doctor: Uuid) -> Appointment {
        let time = Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap();
        Appointment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age: 40,
            gender: Gender::Woman,
            disease: "flu".to_string(),
            blood: BloodGroup::OPos,
            time,
            status,
            location: "Ward 2".to_string(),
            doctor_id: doctor,
            created_at: time,
            updated_at: time,
        }
    }

    #[test]
    fn empty_criteria_match_everything() {
        let a = appointment("Alice Smith", AppointmentStatus::Urgent, 3, Uuid::new_v4());
        assert!(FilterCriteria::default().matches(&a));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let a = appointment("Alice Smith", AppointmentStatus::NonUrgent, 3, Uuid::new_v4());
        let mut f = FilterCriteria::default();
        f.search = Some("ali".to_string());
        assert!(f.matches(&a));
        f.search = Some("SMITH".to_string());
        assert!(f.matches(&a));
        f.search = Some("bob".to_string());
        assert!(!f.matches(&a));
    }

    #[test]
    fn filters_combine_conjunctively() {
        let doctor = Uuid::new_v4();
        let a = appointment("Alice", AppointmentStatus::Urgent, 10, doctor);

        let mut f = FilterCriteria {
            search: Some("ali".to_string()),
            status: StatusFilter::Only(AppointmentStatus::Urgent),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 9),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 11),
        };
        assert!(f.matches(&a));

        // Each clause alone can veto the match.
        f.status = StatusFilter::Only(AppointmentStatus::Emergency);
        assert!(!f.matches(&a));
        f.status = StatusFilter::Only(AppointmentStatus::Urgent);
        f.end_date = NaiveDate::from_ymd_opt(2025, 6, 9);
        assert!(!f.matches(&a));
    }

    #[test]
    fn date_bounds_are_inclusive_whole_days() {
        let a = appointment("Ann", AppointmentStatus::NonUrgent, 10, Uuid::new_v4());
        let same_day = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            ..Default::default()
        };
        assert!(same_day.matches(&a));
    }

    #[test]
    fn status_filter_parses_all_and_absent_as_unconstrained() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("all")).unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("Pass Away")).unwrap(),
            StatusFilter::Only(AppointmentStatus::PassAway)
        );
        assert!(StatusFilter::parse(Some("bogus")).is_err());
    }

    #[test]
    fn query_pairs_omit_absent_criteria() {
        let f = FilterCriteria {
            search: Some("ann".to_string()),
            status: StatusFilter::Only(AppointmentStatus::Urgent),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            end_date: None,
        };
        assert_eq!(
            f.query_pairs(),
            vec![
                ("search", "ann".to_string()),
                ("status", "Urgent".to_string()),
                ("startDate", "2025-06-01".to_string()),
            ]
        );
        assert!(FilterCriteria::default().query_pairs().is_empty());
    }

    #[test]
    fn doctor_scope_restricts_to_own_appointments() {
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        let a = appointment("Ann", AppointmentStatus::NonUrgent, 1, mine);
        assert!(Scope::Doctor(mine).permits(&a));
        assert!(!Scope::Doctor(theirs).permits(&a));
        assert!(Scope::Admin.permits(&a));
    }

    #[test]
    fn page_count_is_ceiling_of_len_over_size() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn page_slice_returns_contiguous_windows() {
        let items: Vec<i32> = (0..12).collect();
        assert_eq!(page_slice(&items, 1, 5), &[0, 1, 2, 3, 4]);
        assert_eq!(page_slice(&items, 2, 5), &[5, 6, 7, 8, 9]);
        assert_eq!(page_slice(&items, 3, 5), &[10, 11]);
    }

    #[test]
    fn out_of_range_pages_clamp_instead_of_erroring() {
        let items: Vec<i32> = (0..12).collect();
        // past the end -> last page
        assert_eq!(page_slice(&items, 99, 5), &[10, 11]);
        // page 0 -> first page
        assert_eq!(page_slice(&items, 0, 5), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn page_one_of_empty_set_is_empty() {
        let items: Vec<i32> = vec![];
        assert!(page_slice(&items, 1, 5).is_empty());
        assert_eq!(total_pages(items.len(), 5), 1);
    }
}

//! # rangefilter2
//!
//! Admin list filters that bound a date or date-time field between two values,
//! with the datepicker shown in the Persian (Jalali) calendar for Persian
//! requests.
//!
//! ## Modules
//!
//! - [`filters`] - [`DateRangeFilter`] and [`DateTimeRangeFilter`], the [`ListFilter`] trait
//! - [`lookups`] - Keyword lookups, values and Q objects
//! - [`queryset`] - The [`QuerySet`] seam and an in-memory [`RecordSet`]
//! - [`changelist`] / [`request`] - The list view's parameters and query strings
//! - [`media`] / [`widgets`] / [`fields`] - Form media, widgets and the split date-time field
//! - [`templates`] - Template selection and Tera rendering
//!
//! ## Example
//!
//! ```
//! use rangefilter2::filters::{DateRangeFilter, ListFilter};
//! use rangefilter2::queryset::{FieldKind, RecordSet};
//! use rangefilter2::request::FilterRequest;
//! use rangefilter2_core::Settings;
//!
//! let request = FilterRequest::from_query_string("created__gte=1710892800000").with_language("fa");
//! let filter = DateRangeFilter::new("created", &request, &Settings::default()).unwrap();
//!
//! let records = RecordSet::new(vec![
//!     serde_json::json!({"id": 1, "created": "2024-03-19"}),
//!     serde_json::json!({"id": 2, "created": "2024-03-20"}),
//! ])
//! .field("created", FieldKind::Date);
//!
//! let filtered = filter.queryset(records).unwrap();
//! assert_eq!(filtered.ids(), vec![2]);
//! ```

pub mod changelist;
pub mod fields;
pub mod filters;
pub mod lookups;
pub mod media;
pub mod queryset;
pub mod request;
pub mod templates;
pub mod widgets;

pub use changelist::ChangeList;
pub use filters::{DateRangeFilter, DateTimeRangeFilter, FilterChoice, ListFilter};
pub use lookups::{LookupError, LookupParams, Value};
pub use media::Media;
pub use queryset::{FieldKind, QuerySet, RecordSet};
pub use request::FilterRequest;
pub use templates::FilterRenderer;

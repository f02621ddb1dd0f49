//! Service layer for ACRFD.
//!
//! Contains the API client and the services built on top of it:
//! - Api (REST access to the public backend)
//! - Sources (traits the aggregator pulls through)
//! - Application (record aggregation with a single-slot memo)
//! - CommentPeriod (current period selection)
//! - Decision (decision lookup with a single-slot memo)
//! - Navigator (location building and navigation events)
//! - UrlState (debounced URL state synchronization)

pub mod api;
mod application;
mod comment_period;
mod decision;
pub mod navigator;
pub mod sources;
mod url_state;

pub use api::ApiService;
pub use application::{status_label, title_case, ApplicationService};
pub use comment_period::{current as current_comment_period, CommentPeriodService};
pub use decision::DecisionService;
pub use navigator::{
    HistoryNavigator, NavigationEnd, NavigationTarget, NavigationTrigger, Navigator,
};
pub use sources::ApplicationSources;
pub use url_state::UrlService;

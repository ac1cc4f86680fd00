//! AgriFeed dashboard: shared state, rendering and the refresh schedule.

pub mod app;
pub mod presenter;
pub mod scheduler;

pub use app::{Dashboard, DashboardState};
pub use presenter::{
    format_date, local_date_line, render_location_badge, render_news, render_weather_card,
    Presenter, TerminalPresenter,
};
pub use scheduler::Scheduler;

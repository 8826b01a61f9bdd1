pub mod aggregator;
pub mod summary;

pub use aggregator::CalendarAggregator;
pub use summary::MoodSummaryService;

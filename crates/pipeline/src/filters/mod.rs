//! Filter implementations for candidate filtering.

pub mod exclude_titles;
pub mod genre;
pub mod quality_gate;
pub mod unseen;

pub use exclude_titles::ExcludeTitlesFilter;
pub use genre::GenreFilter;
pub use quality_gate::QualityGateFilter;
pub use unseen::UnseenFilter;

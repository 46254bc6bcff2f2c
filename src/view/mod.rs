pub mod chart;
pub mod filter;
pub mod header;
pub mod hover;
pub mod loader;
pub mod main_page;
pub mod modal;
pub mod pagination;
pub mod search;
pub mod video_card;
pub mod vtuber_detail;

pub use chart::{ChartDisplay, ChartPanel};
pub use filter::{FilterContext, FilterSubscription};
pub use header::Header;
pub use hover::HoverIntent;
pub use loader::{Fetcher, Loadable};
pub use main_page::{MainPage, Section};
pub use modal::{ModalClick, VideoModal};
pub use pagination::{ResultWindow, PAGE_SIZE};
pub use search::SearchPage;
pub use video_card::VideoCard;
pub use vtuber_detail::VtuberDetailPage;

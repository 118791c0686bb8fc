pub mod cache;
pub mod controller;
pub mod display;
pub mod domain;
pub mod ports;
pub mod prompts;
pub mod session;

pub use cache::PlatformTableCache;
pub use controller::SessionController;
pub use display::{answer_paragraphs, select, Card, PlannedRow, RenderPlan};
pub use domain::{ErrorInfo, FieldValue, Platform, Record, TableRow, TableSnapshot, ViewMode};
pub use ports::{AnswerPayload, FetchCause, FetchError, FetchResult, RequestKind, ReviewGateway};
pub use prompts::{ExampleQuestion, EXAMPLE_QUESTIONS};
pub use session::{Effect, Event, Phase, SessionState};

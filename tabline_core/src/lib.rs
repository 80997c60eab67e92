//! `tabline_core`：Tab 补全的纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **核心可复用**：任何行编辑器宿主都能复用同一套逻辑，终端读写与缓冲区模型留在宿主
//! - **分层清晰**：segmenter -> completer -> filter -> rank/layout -> context 状态机 -> 输出（`Action` + `UiState`）
//! - **结果可复现**：排序是稳定全序，同样的候选与宽度总是渲染出同样的文本
pub mod completer;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod key_event;
pub mod layout;
pub mod model;
pub mod options;
pub mod processor;
pub mod rank;
pub mod segmenter;
pub mod session;

pub use completer::{Completer, StaticCompleter};
pub use context::Phase;
pub use engine::Engine;
pub use error::{CandidateError, OptionsError};
pub use key_event::{Action, BufferEdit, InputEvent, LineView};
pub use layout::Rendered;
pub use model::{Candidate, UiState};
pub use options::CompletionOptions;
pub use rank::MissingSortKey;
pub use segmenter::WhitespaceSegmenter;
pub use session::Session;

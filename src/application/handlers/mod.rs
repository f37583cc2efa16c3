//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod dialogic;
pub mod practice;

pub use dialogic::{
    DialogicError, DialogicSettings, EndSessionCommand, EndSessionHandler, EndSessionResult,
    ListMessagesHandler, ListMessagesQuery, ListMessagesResult, SendMessageCommand,
    SendMessageHandler, SendMessageResult, StartSessionCommand, StartSessionHandler,
    StartSessionResult,
};
pub use practice::{
    EndConversationCommand, EndConversationHandler, EndConversationResult, FeedbackView,
    GetFeedbackHandler, GetFeedbackQuery, PracticeError, RecordMessageCommand,
    RecordMessageHandler, RecordMessageResult, StartConversationCommand,
    StartConversationHandler, StartConversationResult,
};

#![allow(unused_imports)]

use chat_reveal::{
    logging, speaker_counts, ChatSession, ConfigError, ConversationHandle, ConversationStore,
    DelayRange, DelaySampler, EnvConfig, Message, MessageId, ResponseSource, RevealConfig,
    RevealError, RevealScheduler, SourceProfile, Speaker, SubmitOutcome, TurnId, TurnState,
    DEFAULT_WELCOME,
};

#[test]
fn public_api_exports_compile() {}

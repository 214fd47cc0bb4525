use std::time::Duration;

use chat_reveal::{ChatSession, DelayRange, DelaySampler, ResponseSource};
use pretty_assertions::assert_eq;
use response_source_canned::{
    CannedResponses, JitterSampler, CANNED_SOURCE_ID, DEFAULT_RESPONSES,
};

mod support;

use support::{advance_ms, fixed_config, lock_unpoisoned, CountingSource, RecordingSampler};

#[tokio::test(start_paused = true)]
async fn scheduler_samples_think_prep_then_one_delay_per_character() {
    let sampler = RecordingSampler::default();
    let requests = sampler.requests.clone();
    let source = CountingSource::new("hey");
    let choices = source.choices.clone();
    let config = fixed_config();

    let session = ChatSession::with_sources(config.clone(), Box::new(source), Box::new(sampler));
    session.submit("hi").expect("submit succeeds");
    advance_ms(10_000).await;

    let recorded = lock_unpoisoned(&requests).clone();
    assert_eq!(
        recorded,
        vec![
            config.think_delay,
            config.prep_delay,
            config.char_delay,
            config.char_delay,
            config.char_delay,
        ]
    );
    assert_eq!(*lock_unpoisoned(&choices), 1);
    assert_eq!(session.source_profile().source_id, "counting");
    assert_eq!(session.snapshot()[2].text(), "hey");
}

#[tokio::test(start_paused = true)]
async fn reply_is_not_chosen_before_the_prep_pause_ends() {
    let source = CountingSource::new("x");
    let choices = source.choices.clone();
    let session = ChatSession::with_sources(
        fixed_config(),
        Box::new(source),
        Box::new(RecordingSampler::default()),
    );
    session.submit("hi").expect("submit succeeds");

    advance_ms(1000 + 499).await;
    assert_eq!(*lock_unpoisoned(&choices), 0);

    advance_ms(2).await;
    assert_eq!(*lock_unpoisoned(&choices), 1);
}

#[test]
fn jitter_sampler_stays_inside_the_configured_range() {
    let mut sampler = JitterSampler::with_seed(7);
    let range = DelayRange::new(30, 50).expect("ordered range");

    for _ in 0..500 {
        let delay = sampler.sample(range);
        assert!(range.contains(delay), "{delay:?} outside {range}");
    }
    assert_eq!(
        sampler.sample(DelayRange::fixed(12)),
        Duration::from_millis(12)
    );
}

#[test]
fn canned_pool_only_yields_its_entries() {
    let mut source = CannedResponses::with_seed(
        DEFAULT_RESPONSES.iter().map(|reply| reply.to_string()).collect(),
        11,
    );
    let profile = source.profile();
    assert_eq!(profile.source_id, CANNED_SOURCE_ID);
    assert_eq!(profile.pool_size, DEFAULT_RESPONSES.len());

    for _ in 0..100 {
        let reply = source.choose();
        assert!(DEFAULT_RESPONSES.contains(&reply.as_str()), "{reply}");
    }
}

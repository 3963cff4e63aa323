use std::time::Duration;

use solace_test_responder::{PresetStep, ScriptedResponder};
use tokio::time::{self, Instant};

use crate::transcript::{GREETING, Origin};
use crate::{
    ControllerBuilder, DEGRADED_REPLY, FALLBACK_REPLY, ResponderClient,
};

#[tokio::test]
async fn test_send_appends_user_and_assistant_entries() {
    let responder = ScriptedResponder::default();
    responder.add_step(PresetStep::reply("Let's try a breathing exercise"));

    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .build();

    let user_entry =
        controller.send_message("I feel anxious").await.unwrap();
    assert_eq!(user_entry.origin(), Origin::User);
    assert_eq!(user_entry.text(), "I feel anxious");

    let entries = controller.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text(), GREETING);
    assert_eq!(entries[1].id(), user_entry.id());
    assert_eq!(entries[2].origin(), Origin::Assistant);
    assert_eq!(entries[2].text(), "Let's try a breathing exercise");
    assert!(!controller.is_loading());
    assert_eq!(responder.calls(), 1);
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let responder = ScriptedResponder::default();
    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .build();

    assert!(controller.send_message("   \t\n").await.is_none());

    assert_eq!(controller.entries().len(), 1);
    assert!(!controller.is_loading());
    assert_eq!(responder.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_after_retries_are_exhausted() {
    // An empty script fails every invocation.
    let responder = ScriptedResponder::default();
    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .build();

    let start = Instant::now();
    controller.send_message("hello").await.unwrap();

    // One initial attempt plus three retries, with 1s, 2s and 4s
    // backoffs in between.
    assert_eq!(responder.calls(), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(7));

    let entries = controller.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].text(), "hello");
    assert_eq!(entries[2].origin(), Origin::Assistant);
    assert_eq!(entries[2].text(), FALLBACK_REPLY);
    assert!(!controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_success_on_a_later_attempt() {
    let responder = ScriptedResponder::default();
    responder.add_step(PresetStep::failure());
    responder.add_step(PresetStep::failure());
    responder.add_step(PresetStep::reply("here for you"));

    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .build();

    let start = Instant::now();
    controller.send_message("hi").await.unwrap();

    assert_eq!(responder.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(3));

    let entries = controller.entries();
    assert_eq!(entries.last().unwrap().text(), "here for you");
}

#[tokio::test]
async fn test_clear_messages_reseeds_the_greeting() {
    let responder = ScriptedResponder::default();
    responder.add_step(PresetStep::reply("ok"));

    let controller = ControllerBuilder::new()
        .with_responder(responder)
        .build();
    let original_greeting_id = controller.entries()[0].id();

    controller.send_message("hi").await.unwrap();
    assert_eq!(controller.entries().len(), 3);

    controller.clear_messages();

    let entries = controller.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].origin(), Origin::Assistant);
    assert_eq!(entries[0].text(), GREETING);
    // The greeting is reseeded, not restored.
    assert_ne!(entries[0].id(), original_greeting_id);
}

#[tokio::test]
async fn test_update_responder_rejects_none() {
    let responder = ScriptedResponder::default();
    responder.add_step(PresetStep::reply("still here"));

    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .build();

    controller.update_responder(None);
    controller.send_message("hi").await.unwrap();

    assert_eq!(responder.calls(), 1);
    assert_eq!(controller.entries().last().unwrap().text(), "still here");
}

#[tokio::test]
async fn test_update_responder_swaps_for_future_sends() {
    let original = ScriptedResponder::default();
    let replacement = ScriptedResponder::default();
    replacement.add_step(PresetStep::reply("from the new responder"));

    let controller = ControllerBuilder::new()
        .with_responder(original.clone())
        .build();

    controller
        .update_responder(Some(ResponderClient::new(replacement.clone())));
    controller.send_message("hi").await.unwrap();

    assert_eq!(original.calls(), 0);
    assert_eq!(replacement.calls(), 1);
    assert_eq!(
        controller.entries().last().unwrap().text(),
        "from the new responder"
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_responder_degrades_without_retrying() {
    let controller = ControllerBuilder::new().build();

    let start = Instant::now();
    controller.send_message("hello").await.unwrap();

    // The degraded reply is immediate, no backoff is consumed.
    assert_eq!(start.elapsed(), Duration::ZERO);

    let entries = controller.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].text(), DEGRADED_REPLY);
    assert!(!controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_is_set_while_a_send_is_in_flight() {
    let responder = ScriptedResponder::default();
    responder
        .add_step(PresetStep::reply("done").with_delay(Duration::from_secs(5)));

    let controller = ControllerBuilder::new()
        .with_responder(responder)
        .build();

    let send = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send_message("hi").await }
    });
    // Let the send reach the responder.
    tokio::task::yield_now().await;
    assert!(controller.is_loading());

    send.await.unwrap().unwrap();
    assert!(!controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_system_prompt_is_reread_on_each_attempt() {
    let responder = ScriptedResponder::default();
    responder.add_step(PresetStep::failure());
    responder.add_step(PresetStep::reply("ok"));

    let controller = ControllerBuilder::new()
        .with_responder(responder.clone())
        .with_system_prompt("first persona")
        .build();

    let send = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send_message("hi").await }
    });
    // Swap the prompt while the send waits out the first backoff.
    time::sleep(Duration::from_millis(500)).await;
    controller.set_system_prompt("second persona");
    send.await.unwrap().unwrap();

    assert_eq!(
        responder.seen_prompts(),
        ["first persona", "second persona"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_responder_swap_takes_effect_on_the_next_attempt() {
    let original = ScriptedResponder::default();
    let replacement = ScriptedResponder::default();
    replacement.add_step(PresetStep::reply("I'm back"));

    let controller = ControllerBuilder::new()
        .with_responder(original.clone())
        .build();

    let send = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send_message("hi").await }
    });
    // Swap the responder while the send waits out the first backoff.
    time::sleep(Duration::from_millis(500)).await;
    controller
        .update_responder(Some(ResponderClient::new(replacement.clone())));
    send.await.unwrap().unwrap();

    assert_eq!(original.calls(), 1);
    assert_eq!(replacement.calls(), 1);
    assert_eq!(controller.entries().last().unwrap().text(), "I'm back");
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_sends_interleave_by_completion() {
    let responder = ScriptedResponder::default();
    responder.add_step(
        PresetStep::reply("slow reply").with_delay(Duration::from_secs(5)),
    );
    responder.add_step(PresetStep::reply("fast reply"));

    let controller = ControllerBuilder::new()
        .with_responder(responder)
        .build();

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send_message("one").await }
    });
    tokio::task::yield_now().await;
    controller.send_message("two").await.unwrap();
    first.await.unwrap().unwrap();

    // There is no single-flight guard: the second send completes first,
    // so its reply lands before the first send's.
    let texts: Vec<_> = controller
        .entries()
        .iter()
        .map(|entry| entry.text().to_owned())
        .collect();
    assert_eq!(texts, [GREETING, "one", "two", "fast reply", "slow reply"]);
}

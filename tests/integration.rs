//! End-to-end scenarios through the store and selectors.

use channel_state::{
    BootstrapSnapshot, ChannelEvent, ChannelId, ChannelStore, DmSnapshot, InMemoryDirectory,
    Message, MessageId, MessageRef, ReadStateSnapshot, ServerChannelSnapshot, ServerId,
    ServerSnapshot, StoreConfig, StoreUpdate, SubscriptionConfig, SubscriptionFilter, Timestamp,
    UserId,
};
use serde_json::json;
use std::time::Duration;

const T_JOIN: &str = "2023-04-30T12:00:00Z";
const T0: &str = "2023-05-01T10:00:00Z";

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn bootstrap(mention_count: usize) -> ChannelEvent {
    ChannelEvent::BootstrapSnapshot(BootstrapSnapshot {
        servers: vec![ServerSnapshot {
            id: ServerId::from("s1"),
            channels: vec![
                ServerChannelSnapshot {
                    id: ChannelId::from("c1"),
                    name: Some("general".into()),
                    last_message_at: Some(ts(T0)),
                },
                ServerChannelSnapshot {
                    id: ChannelId::from("c2"),
                    name: Some("random".into()),
                    last_message_at: None,
                },
            ],
        }],
        dms: vec![
            DmSnapshot {
                id: ChannelId::from("d-old"),
                name: None,
                last_message_at: Some(ts("2023-04-01T00:00:00Z")),
                members: vec![UserId::from("me"), UserId::from("u2")],
                owner: Some(UserId::from("me")),
            },
            DmSnapshot {
                id: ChannelId::from("d-new"),
                name: None,
                last_message_at: Some(ts("2023-05-02T00:00:00Z")),
                members: vec![UserId::from("me"), UserId::from("u3")],
                owner: Some(UserId::from("u3")),
            },
            DmSnapshot {
                id: ChannelId::from("d-outsider"),
                name: None,
                last_message_at: Some(ts("2023-04-15T00:00:00Z")),
                members: vec![UserId::from("me"), UserId::from("u9")],
                owner: Some(UserId::from("me")),
            },
        ],
        read_states: vec![ReadStateSnapshot {
            channel: ChannelId::from("c1"),
            last_read_at: None,
            mention_count,
        }],
    })
}

fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_user("me", "Myself")
        .with_user("u1", "Alice")
        .with_user("u2", "Bob")
        .with_user("u3", "Carol")
        .with_user("u9", "Mallory")
        .with_member("s1", "me", ts(T_JOIN))
        .with_member("s1", "u1", ts(T_JOIN))
        .with_member("s1", "u2", ts(T_JOIN))
        .with_member("s1", "u3", ts(T_JOIN))
}

fn store() -> ChannelStore {
    init_tracing();
    let store = ChannelStore::new(StoreConfig::new("me"));
    store.dispatch(bootstrap(0));
    store
}

fn message(id: &str, channel: &str, author: &str, at: &str, mentions: &[&str]) -> Message {
    let mut children = vec![json!({ "text": "hello " })];
    children.extend(
        mentions
            .iter()
            .map(|user| json!({ "type": "user", "ref": user })),
    );
    Message {
        id: MessageId::from(id),
        channel: ChannelId::from(channel),
        author: UserId::from(author),
        created_at: ts(at),
        blocks: vec![json!({ "type": "paragraph", "children": children })],
    }
}

#[test]
fn test_never_read_server_channel_is_unread_after_join() {
    let store = store();
    let state = store.snapshot();
    let directory = directory();

    let channel = store
        .selectors(&state, &directory)
        .select_channel(&ChannelId::from("c1"))
        .unwrap();

    assert!(channel.has_unread);
    assert_eq!(channel.mention_count, 0);
    assert_eq!(channel.name.as_deref(), Some("general"));
}

#[test]
fn test_channel_without_messages_is_read() {
    let store = store();
    let state = store.snapshot();
    let directory = directory();

    let channel = store
        .selectors(&state, &directory)
        .select_channel(&ChannelId::from("c2"))
        .unwrap();
    assert!(!channel.has_unread);
}

#[test]
fn test_mark_read_clears_unread() {
    let store = store();
    store.dispatch(ChannelEvent::MarkChannelRead {
        channel_id: ChannelId::from("c1"),
        date: ts("2023-05-01T10:30:00Z"),
    });

    let state = store.snapshot();
    let directory = directory();
    let channel = store
        .selectors(&state, &directory)
        .select_channel(&ChannelId::from("c1"))
        .unwrap();
    assert!(!channel.has_unread);
    assert_eq!(channel.last_read_at, Some(ts("2023-05-01T10:30:00Z")));
}

#[test]
fn test_mark_read_is_idempotent() {
    let store = store();
    let event = ChannelEvent::MarkChannelRead {
        channel_id: ChannelId::from("c1"),
        date: ts("2023-05-01T10:30:00Z"),
    };

    store.dispatch(event.clone());
    let once = store.snapshot();
    store.dispatch(event);
    let twice = store.snapshot();

    assert_eq!(*once, *twice);
}

#[test]
fn test_bootstrap_mention_count_is_preserved() {
    init_tracing();
    let store = ChannelStore::new(StoreConfig::new("me"));
    store.dispatch(bootstrap(3));

    let state = store.snapshot();
    let directory = directory();
    let channel = store
        .selectors(&state, &directory)
        .select_channel(&ChannelId::from("c1"))
        .unwrap();
    assert_eq!(channel.mention_count, 3);
}

#[test]
fn test_mention_created_then_removed() {
    let store = store();
    let directory = directory();
    let c1 = ChannelId::from("c1");
    let count = |store: &ChannelStore| {
        let state = store.snapshot();
        store
            .selectors(&state, &directory)
            .select_channel(&c1)
            .unwrap()
            .mention_count
    };

    let before = count(&store);

    let msg = message("m1", "c1", "u1", "2023-05-01T11:00:00Z", &["me"]);
    store.dispatch(ChannelEvent::RemoteMessageCreated {
        message: msg.clone(),
    });
    assert_eq!(count(&store), before + 1);

    store.dispatch(ChannelEvent::RemoteMessageRemoved {
        message: MessageRef::from(&msg),
    });
    assert_eq!(count(&store), before);
}

#[test]
fn test_typing_then_message_clears_typist() {
    let store = store();
    let directory = directory();
    let c1 = ChannelId::from("c1");

    store.dispatch(ChannelEvent::UserStartedTyping {
        channel_id: c1.clone(),
        user_id: UserId::from("u1"),
    });
    store.dispatch(ChannelEvent::UserStartedTyping {
        channel_id: c1.clone(),
        user_id: UserId::from("me"),
    });

    {
        let state = store.snapshot();
        let selectors = store.selectors(&state, &directory);
        let channel = selectors.select_channel(&c1).unwrap();
        let names: Vec<_> = channel
            .typing_members
            .iter()
            .filter_map(|user| user.display_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Alice"]);
        assert_eq!(selectors.select_channel_typing_user_ids(&c1).len(), 2);
    }

    store.dispatch(ChannelEvent::RemoteMessageCreated {
        message: message("m1", "c1", "u1", "2023-05-01T11:00:00Z", &[]),
    });

    let state = store.snapshot();
    let typing = store
        .selectors(&state, &directory)
        .select_channel_typing_user_ids(&c1);
    assert_eq!(typing, vec![UserId::from("me")]);
}

#[test]
fn test_own_message_keeps_channel_read() {
    let store = store();
    let directory = directory();
    let c1 = ChannelId::from("c1");

    store.dispatch(ChannelEvent::MessageSent {
        message: message("m1", "c1", "me", "2023-05-01T11:00:00Z", &[]),
    });
    store.dispatch(ChannelEvent::MessageConfirmed {
        message: message("m1", "c1", "me", "2023-05-01T11:00:00Z", &[]),
    });
    store.dispatch(ChannelEvent::RemoteMessageCreated {
        message: message("m1", "c1", "me", "2023-05-01T11:00:00Z", &[]),
    });

    let state = store.snapshot();
    let channel = store
        .selectors(&state, &directory)
        .select_channel(&c1)
        .unwrap();
    assert!(!channel.has_unread);
    assert_eq!(channel.last_message_at, Some(ts("2023-05-01T11:00:00Z")));
}

#[test]
fn test_dm_channels_sorted_by_recency() {
    let store = store();
    let state = store.snapshot();
    let directory = directory();

    let ids: Vec<String> = store
        .selectors(&state, &directory)
        .select_dm_channels()
        .into_iter()
        .map(|channel| channel.id.to_string())
        .collect();
    assert_eq!(ids, vec!["d-new", "d-outsider", "d-old"]);
}

#[test]
fn test_server_channels_and_server_dms() {
    let store = store();
    let state = store.snapshot();
    let directory = directory();
    let selectors = store.selectors(&state, &directory);
    let s1 = ServerId::from("s1");

    let mut channel_ids: Vec<String> = selectors
        .select_server_channels(&s1)
        .into_iter()
        .map(|channel| channel.id.to_string())
        .collect();
    channel_ids.sort();
    assert_eq!(channel_ids, vec!["c1", "c2"]);

    let dm_ids: Vec<String> = selectors
        .select_server_dm_channels(&s1)
        .into_iter()
        .map(|channel| channel.id.to_string())
        .collect();
    assert_eq!(dm_ids, vec!["d-new", "d-old"]);

    let dm = selectors
        .select_channel(&ChannelId::from("d-new"))
        .unwrap();
    assert_eq!(dm.name.as_deref(), Some("Carol"));

    assert!(selectors
        .select_server_channels(&ServerId::from("s2"))
        .is_empty());
}

#[test]
fn test_dispatch_json_roundtrip_through_store() {
    let store = store();
    let seq = store
        .dispatch_json(
            &json!({
                "type": "remote-message-created",
                "message": {
                    "id": "m7",
                    "channel": "c1",
                    "author": "u2",
                    "created_at": "2023-05-01T12:00:00Z",
                    "blocks": [{
                        "type": "paragraph",
                        "children": [{ "type": "user", "ref": "me" }]
                    }]
                }
            })
            .to_string(),
        )
        .unwrap();
    assert_eq!(seq.0, 2);

    let state = store.snapshot();
    let record = state.channel(&ChannelId::from("c1")).unwrap();
    assert!(record.unread_mentions.contains(&MessageId::from("m7")));
}

#[test]
fn test_subscriber_sees_applied_events() {
    let store = store();
    let handle = store.subscribe(SubscriptionConfig {
        filter: SubscriptionFilter::channels(vec![ChannelId::from("c1")]),
        ..Default::default()
    });

    store.dispatch(ChannelEvent::mark_read_now("c2"));
    let seq = store.dispatch(ChannelEvent::mark_read_now("c1"));

    match handle.recv_timeout(Duration::from_millis(100)).unwrap() {
        StoreUpdate::Applied {
            sequence,
            kind,
            channel_id,
        } => {
            assert_eq!(sequence, seq);
            assert_eq!(kind, "mark-channel-read");
            assert_eq!(channel_id, Some(ChannelId::from("c1")));
        }
        other => panic!("Expected Applied, got {:?}", other),
    }

    store.unsubscribe(handle.id);
    assert_eq!(store.subscription_count(), 0);
}

#[test]
fn test_concurrent_readers_see_consistent_snapshots() {
    let store = std::sync::Arc::new(store());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let state = store.snapshot();
                    assert_eq!(state.entries_by_id.len(), 5);
                }
            })
        })
        .collect();

    for i in 0..100 {
        store.dispatch(ChannelEvent::RemoteMessageCreated {
            message: message(&format!("m{}", i), "c1", "u1", T0, &["me"]),
        });
    }

    for reader in readers {
        reader.join().unwrap();
    }

    let state = store.snapshot();
    assert_eq!(
        state
            .channel(&ChannelId::from("c1"))
            .unwrap()
            .mention_count(),
        100
    );
}

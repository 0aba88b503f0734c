use chrono::Duration;
use storage::repository::{
    ChatRepository, KeyValueStore, MessageRepository, NewRoadmapRecord, NewRoadmapStep,
    RoadmapRepository, Storage, StorageError, UserRepository, VoteRepository,
};
use storage::sqlite::SqliteRepository;
use tutor_core::model::{
    Chat, ChatId, Message, MessageId, Role, RoadmapId, User, UserId, Visibility, Vote,
};
use tutor_core::time::fixed_now;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

async fn seed_chat(repo: &SqliteRepository, email: &str, minutes: i64) -> (User, Chat) {
    let user = match repo.find_user_by_email(email).await.unwrap() {
        Some(user) => user,
        None => {
            let user = User::new(UserId::random(), email).unwrap();
            repo.insert_user(&user).await.unwrap();
            user
        }
    };
    let chat = Chat::new(
        ChatId::random(),
        user.id(),
        format!("Chat {minutes}"),
        Visibility::Private,
        fixed_now() + Duration::minutes(minutes),
    )
    .unwrap();
    repo.insert_chat(&chat).await.unwrap();
    (user, chat)
}

#[tokio::test]
async fn sqlite_roundtrip_chat_messages_and_votes() {
    let repo = connect("memdb_chat_roundtrip").await;
    let (user, chat) = seed_chat(&repo, "ada@example.com", 0).await;

    let fetched = repo.get_chat(chat.id()).await.unwrap().expect("chat");
    assert_eq!(fetched, chat);
    assert_eq!(fetched.visibility(), Visibility::Private);

    let question = Message::new(
        MessageId::random(),
        chat.id(),
        Role::User,
        "What is HTML?",
        fixed_now(),
    )
    .unwrap();
    // Same timestamp: insertion order must still win.
    let answer = Message::new(
        MessageId::random(),
        chat.id(),
        Role::Assistant,
        r#"{"learningCard": {"title": "HTML"}}"#,
        fixed_now(),
    )
    .unwrap();
    repo.append_message(&question).await.unwrap();
    repo.append_message(&answer).await.unwrap();

    let messages = repo.list_messages(chat.id()).await.unwrap();
    assert_eq!(messages, vec![question.clone(), answer.clone()]);
    assert_eq!(
        repo.get_message(answer.id()).await.unwrap().map(|m| m.role()),
        Some(Role::Assistant)
    );

    for is_upvoted in [true, false] {
        repo.upsert_vote(&Vote {
            chat_id: chat.id(),
            message_id: answer.id(),
            is_upvoted,
        })
        .await
        .unwrap();
    }
    let votes = repo.list_votes(chat.id()).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert!(!votes[0].is_upvoted);

    let listed = repo.list_chats(user.id()).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn sqlite_constraints_map_to_storage_errors() {
    let repo = connect("memdb_constraints").await;
    let (_, chat) = seed_chat(&repo, "grace@example.com", 0).await;

    let twin = User::new(UserId::random(), "grace@example.com").unwrap();
    assert!(matches!(
        repo.insert_user(&twin).await.unwrap_err(),
        StorageError::Conflict
    ));

    let orphan = Message::new(
        MessageId::random(),
        ChatId::random(),
        Role::User,
        "hello?",
        fixed_now(),
    )
    .unwrap();
    assert!(matches!(
        repo.append_message(&orphan).await.unwrap_err(),
        StorageError::NotFound
    ));

    assert!(matches!(
        repo.insert_chat(&chat).await.unwrap_err(),
        StorageError::Conflict
    ));
}

#[tokio::test]
async fn sqlite_delete_chat_cascades_and_lists_newest_first() {
    let repo = connect("memdb_delete_cascade").await;
    let (user, older) = seed_chat(&repo, "linus@example.com", 0).await;
    let (_, newer) = seed_chat(&repo, "linus@example.com", 10).await;

    let listed = repo.list_chats(user.id()).await.unwrap();
    assert_eq!(listed[0].id(), newer.id());
    assert_eq!(listed[1].id(), older.id());

    let reply = Message::new(
        MessageId::random(),
        older.id(),
        Role::Assistant,
        "Sure.",
        fixed_now(),
    )
    .unwrap();
    repo.append_message(&reply).await.unwrap();
    repo.upsert_vote(&Vote {
        chat_id: older.id(),
        message_id: reply.id(),
        is_upvoted: true,
    })
    .await
    .unwrap();

    repo.delete_chat(older.id()).await.unwrap();
    assert!(repo.get_chat(older.id()).await.unwrap().is_none());
    assert!(repo.list_messages(older.id()).await.unwrap().is_empty());
    assert!(repo.list_votes(older.id()).await.unwrap().is_empty());
    assert!(matches!(
        repo.delete_chat(older.id()).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn sqlite_roadmaps_keep_step_order() {
    let repo = connect("memdb_roadmaps").await;
    let id = repo
        .insert_roadmap(NewRoadmapRecord {
            title: "Frontend".into(),
            description: Some("From markup to frameworks".into()),
            steps: ["HTML", "CSS", "JavaScript"]
                .into_iter()
                .map(|title| NewRoadmapStep {
                    title: title.into(),
                    description: None,
                })
                .collect(),
            created_at: fixed_now(),
        })
        .await
        .unwrap();

    let record = repo.get_roadmap(id).await.unwrap().expect("roadmap");
    assert_eq!(record.title, "Frontend");
    let titles: Vec<_> = record.steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["HTML", "CSS", "JavaScript"]);
    assert_eq!(
        record.steps.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let listed = repo.list_roadmaps().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].step_count, 3);
    assert!(repo.get_roadmap(RoadmapId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_key_value_store_overwrites_and_removes() {
    let repo = connect("memdb_kv").await;
    repo.set_many(&[
        ("learningPathwayProgress:a".into(), r#"{"Beginner":[0]}"#.into()),
        ("learningPathwayQuizAnswers:a".into(), "{}".into()),
    ])
    .await
    .unwrap();
    repo.set_many(&[("learningPathwayProgress:a".into(), r#"{"Beginner":[0,1]}"#.into())])
        .await
        .unwrap();

    assert_eq!(
        repo.get("learningPathwayProgress:a").await.unwrap().as_deref(),
        Some(r#"{"Beginner":[0,1]}"#)
    );

    repo.remove_many(&[
        "learningPathwayProgress:a".into(),
        "learningPathwayQuizAnswers:a".into(),
    ])
    .await
    .unwrap();
    assert!(repo.get("learningPathwayProgress:a").await.unwrap().is_none());
    assert!(repo.get("learningPathwayQuizAnswers:a").await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent_and_storage_wires_up() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");

    let storage = Storage::sqlite("sqlite:file:memdb_storage_wiring?mode=memory&cache=shared")
        .await
        .expect("storage");
    assert!(storage.kv.get("missing").await.unwrap().is_none());
    assert!(storage.roadmaps.list_roadmaps().await.unwrap().is_empty());
}

use eventbook_event::{EventPatch, EventRepository, NewEvent};
use eventbook_shared::Error;
use eventbook_user::UserRepository;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_create_event_rejects_invalid_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;

    let resp = helpers::create_event(&repos, &admin, "Concert", "2024-13-40").await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Invalid date format. Use ISO format (YYYY-MM-DDTHH:MM:SS)"
    );

    assert!(repos.events.list_events().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_event_round_trips_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;

    let id = helpers::create_event(&repos, &admin, "Concert", "2024-05-01T10:00:00Z").await?;
    let event = repos.events.find_event(&id).await?.unwrap();

    assert_eq!(eventbook_shared::format_timestamp(&event.date), "2024-05-01T10:00:00Z");
    assert_eq!(event.title, "Concert");
    assert_eq!(event.admin_id, admin);
    assert_eq!(event.image_url, None);

    Ok(())
}

#[tokio::test]
async fn test_create_event_requires_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;

    let resp = repos
        .events
        .create_event(
            &admin,
            NewEvent {
                title: "Concert".to_owned(),
                date: "2024-05-01T10:00:00Z".to_owned(),
                location: "Paris".to_owned(),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(resp, Err(Error::Validation(_))));

    let resp = repos
        .events
        .create_event(
            &admin,
            NewEvent {
                title: "x".repeat(151),
                description: "desc".to_owned(),
                date: "2024-05-01T10:00:00Z".to_owned(),
                location: "Paris".to_owned(),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(resp, Err(Error::Validate(_))));

    Ok(())
}

#[tokio::test]
async fn test_list_events_ordered_by_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;
    let other = helpers::create_user(&repos, "other", true).await?;

    helpers::create_event(&repos, &admin, "Late", "2024-09-01T10:00:00Z").await?;
    helpers::create_event(&repos, &other, "Early", "2024-01-01 08:30:00").await?;
    helpers::create_event(&repos, &admin, "Middle", "2024-05-01T12:00:00+02:00").await?;

    let titles: Vec<String> = repos
        .events
        .list_events()
        .await?
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Early", "Middle", "Late"]);

    let titles: Vec<String> = repos
        .events
        .list_events_by_admin(&admin)
        .await?
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Middle", "Late"]);

    Ok(())
}

#[tokio::test]
async fn test_update_event_applies_present_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;
    let id = helpers::create_event(&repos, &admin, "Concert", "2024-05-01T10:00:00Z").await?;

    let event = repos
        .events
        .update_event(
            &id,
            EventPatch {
                title: Some("Jazz night".to_owned()),
                image_url: Some(Some("https://img.test/jazz.png".to_owned())),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(event.title, "Jazz night");
    assert_eq!(event.image_url.as_deref(), Some("https://img.test/jazz.png"));
    assert_eq!(event.description, "An evening of music");
    assert_eq!(event.location, "Paris");
    assert_eq!(eventbook_shared::format_timestamp(&event.date), "2024-05-01T10:00:00Z");

    let event = repos
        .events
        .update_event(
            &id,
            EventPatch {
                date: Some("2024-06-02T18:00:00".to_owned()),
                image_url: Some(Some(String::new())),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(eventbook_shared::format_timestamp(&event.date), "2024-06-02T18:00:00Z");
    assert_eq!(event.image_url, None);
    assert_eq!(repos.events.find_event(&id).await?, Some(event.clone()));

    let unchanged = repos.events.update_event(&id, EventPatch::default()).await?;
    assert_eq!(unchanged, event);

    repos
        .events
        .update_event(
            &id,
            EventPatch {
                image_url: Some(Some("https://img.test/jazz.png".to_owned())),
                ..Default::default()
            },
        )
        .await?;
    let event = repos
        .events
        .update_event(
            &id,
            EventPatch {
                image_url: Some(None),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(event.image_url, None);
    assert_eq!(event.title, "Jazz night");

    Ok(())
}

#[tokio::test]
async fn test_update_event_failures() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;
    let id = helpers::create_event(&repos, &admin, "Concert", "2024-05-01T10:00:00Z").await?;

    let resp = repos
        .events
        .update_event("01HZZZZZZZZZZZZZZZZZZZZZZZ", EventPatch::default())
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Event not found");

    let resp = repos
        .events
        .update_event(
            &id,
            EventPatch {
                title: Some("Renamed".to_owned()),
                date: Some("01/05/2024".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(resp, Err(Error::InvalidDate)));

    let event = repos.events.find_event(&id).await?.unwrap();
    assert_eq!(event.title, "Concert");

    Ok(())
}

#[tokio::test]
async fn test_delete_event() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;
    let id = helpers::create_event(&repos, &admin, "Concert", "2024-05-01T10:00:00Z").await?;

    repos.events.delete_event(&id).await?;
    assert_eq!(repos.events.find_event(&id).await?, None);
    assert!(matches!(
        repos.events.delete_event(&id).await,
        Err(Error::NotFound("Event"))
    ));

    Ok(())
}

#[tokio::test]
async fn test_delete_user_cascades_to_events() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repos = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let admin = helpers::create_user(&repos, "admin", true).await?;
    let other = helpers::create_user(&repos, "other", true).await?;

    helpers::create_event(&repos, &admin, "Concert", "2024-05-01T10:00:00Z").await?;
    helpers::create_event(&repos, &other, "Theatre", "2024-05-02T10:00:00Z").await?;

    repos.users.delete(&admin).await?;

    let events = repos.events.list_events().await?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Theatre");
    assert!(repos.events.list_events_by_admin(&admin).await?.is_empty());

    Ok(())
}

use eventbook_shared::Error;
use eventbook_user::RegisterInput;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn validate_unique_usernames() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    cmd.register(RegisterInput {
        username: "john.doe".to_owned(),
        password: "my_password".to_owned(),
        image_url: None,
        is_admin: false,
    })
    .await?;

    let user_2 = cmd
        .register(RegisterInput {
            username: "john.doe".to_owned(),
            password: "my_password_v2".to_owned(),
            image_url: None,
            is_admin: false,
        })
        .await;

    assert!(matches!(user_2, Err(Error::DuplicateUsername)));
    assert_eq!(
        user_2.unwrap_err().to_string(),
        "Username already exists".to_owned()
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user WHERE username = 'john.doe'")
        .fetch_one(&state.read_db)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn validate_required_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    for (username, password) in [("", "my_password"), ("john", ""), ("   ", "x")] {
        let resp = cmd
            .register(RegisterInput {
                username: username.to_owned(),
                password: password.to_owned(),
                image_url: None,
                is_admin: false,
            })
            .await;

        assert_eq!(
            resp.unwrap_err().to_string(),
            "Username and password are required"
        );
    }

    let resp = cmd
        .register(RegisterInput {
            username: "x".repeat(81),
            password: "my_password".to_owned(),
            image_url: None,
            is_admin: false,
        })
        .await;
    assert!(matches!(resp, Err(Error::Validate(_))));

    Ok(())
}

#[tokio::test]
async fn password_is_stored_hashed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    let id = helpers::create_user(&cmd, "john").await?;

    let (password,): (String,) = sqlx::query_as("SELECT password FROM user WHERE id = ?1")
        .bind(&id)
        .fetch_one(&state.read_db)
        .await?;

    assert_ne!(password, "my_password");
    assert!(password.starts_with("$argon2id$"));

    Ok(())
}

#[tokio::test]
async fn self_granted_admin_requires_opt_in() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    let id = cmd
        .register(RegisterInput {
            username: "mallory".to_owned(),
            password: "my_password".to_owned(),
            image_url: Some("https://img.test/m.png".to_owned()),
            is_admin: true,
        })
        .await?;

    let user = cmd.repository().find_by_id(&id).await?.unwrap();
    assert!(!user.is_admin);
    assert_eq!(user.image_url.as_deref(), Some("https://img.test/m.png"));

    let cmd = cmd.allow_self_admin(true);
    let id = cmd
        .register(RegisterInput {
            username: "alice".to_owned(),
            password: "my_password".to_owned(),
            image_url: Some(String::new()),
            is_admin: true,
        })
        .await?;

    let user = cmd.repository().find_by_id(&id).await?.unwrap();
    assert!(user.is_admin);
    assert_eq!(user.image_url, None);

    Ok(())
}

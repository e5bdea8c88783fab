//! Server-rendered web interface: the same data as the API, behind a
//! session-cookie login with redirect-to-`/login` gating.
//!
//! Validation failures re-render the submitted form with inline field
//! errors; successful submissions redirect back to the listing page.

use crate::{
    db,
    error::{AppError, FieldErrors},
    middleware::auth::{
        clear_session_cookie, create_refresh_token, session_cookie, user_from_cookie_header,
        PageUser,
    },
    models::*,
    services::html::{escape, field_error, layout, option_tag},
};
use axum::{
    extract::{Path, State},
    http::{header::{COOKIE, SET_COOKIE}, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};

use super::skills::AppState;

fn page(title: &str, logged_in: bool, body: &str) -> Html<String> {
    Html(layout(title, logged_in, body))
}

/// Unwrap a validation failure for form re-rendering; anything else keeps
/// propagating.
fn form_errors(err: AppError) -> Result<FieldErrors, AppError> {
    match err {
        AppError::Validation(errors) => Ok(errors),
        other => Err(other),
    }
}

fn login_redirect(state: &AppState, user: &str) -> Result<Response, AppError> {
    let token = create_refresh_token(user, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Redirect::to("/dashboard"),
    )
        .into_response())
}

// ── Home and auth pages ──

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_header = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    if user_from_cookie_header(cookie_header, &state.jwt_secret).is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let body = r#"
        <h1>SkillTrack</h1>
        <p>Track the skills you are learning, log study sessions against
        them, and watch your progress on the dashboard.</p>
        <p><a href="/register">Create an account</a> or
        <a href="/login">log in</a> to get started.</p>
    "#;
    page("Home", false, body).into_response()
}

fn login_form_html(username: &str, error_message: Option<&str>) -> String {
    let error = match error_message {
        Some(message) => format!(r#"<p class="field-error">{}</p>"#, escape(message)),
        None => String::new(),
    };
    format!(
        r#"<h1>Log in</h1>
        {error}
        <form method="post" action="/login">
            <label for="username">Username</label>
            <input id="username" name="username" value="{username}" required>
            <label for="password">Password</label>
            <input id="password" name="password" type="password" required>
            <button type="submit">Log in</button>
        </form>
        <p class="muted">No account yet? <a href="/register">Register</a>.</p>"#,
        username = escape(username),
    )
}

pub async fn login_page() -> Html<String> {
    page("Log in", false, &login_form_html("", None))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> Result<Response, AppError> {
    match super::auth::authenticate(&state, &req.username, &req.password).await {
        Ok(user) => login_redirect(&state, &user.id),
        Err(AppError::Unauthorized(_)) => Ok(page(
            "Log in",
            false,
            &login_form_html(&req.username, Some("Invalid username or password")),
        )
        .into_response()),
        Err(other) => Err(other),
    }
}

fn register_form_html(req: &RegisterRequest, errors: Option<&FieldErrors>) -> String {
    format!(
        r#"<h1>Register</h1>
        <form method="post" action="/register">
            <label for="username">Username</label>
            <input id="username" name="username" value="{username}" required>
            {username_error}
            <label for="email">Email</label>
            <input id="email" name="email" type="email" value="{email}" required>
            {email_error}
            <label for="password">Password</label>
            <input id="password" name="password" type="password" required>
            {password_error}
            <button type="submit">Register</button>
        </form>
        <p class="muted">Already registered? <a href="/login">Log in</a>.</p>"#,
        username = escape(&req.username),
        email = escape(&req.email),
        username_error = field_error(errors, "username"),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
    )
}

pub async fn register_page() -> Html<String> {
    page("Register", false, &register_form_html(&RegisterRequest::default(), None))
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(req): Form<RegisterRequest>,
) -> Result<Response, AppError> {
    match super::auth::create_account(&state, &req).await {
        Ok(user) => login_redirect(&state, &user.id),
        Err(err) => {
            let errors = form_errors(err)?;
            Ok(page("Register", false, &register_form_html(&req, Some(&errors))).into_response())
        }
    }
}

pub async fn logout() -> Response {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/"),
    )
        .into_response()
}

// ── Dashboard ──

pub async fn dashboard_page(
    State(state): State<AppState>,
    user: PageUser,
) -> Result<Html<String>, AppError> {
    let stats = db::stats::dashboard(&state.pool, &user.user_id).await?;

    let last_session = match &stats.last_session {
        Some(session) => format!(
            "<p>Last session: <strong>{}</strong> on {} ({})</p>",
            escape(&session.skill_name),
            escape(&session.date),
            duration_label(session.duration_minutes),
        ),
        None => "<p class=\"muted\">No sessions logged yet. \
                 <a href=\"/sessions/new\">Log your first one</a>.</p>"
            .to_string(),
    };

    let categories = if stats.top_categories.is_empty() {
        String::new()
    } else {
        let items: String = stats
            .top_categories
            .iter()
            .map(|c| format!("<li>{} — {} sessions</li>", escape(&c.category), c.sessions))
            .collect();
        format!("<h2>Top categories</h2><ul>{items}</ul>")
    };

    let daily = if stats.daily_minutes.is_empty() {
        String::new()
    } else {
        let rows: String = stats
            .daily_minutes
            .iter()
            .map(|d| format!("<tr><td>{}</td><td>{:.1}</td></tr>", escape(&d.date), d.minutes))
            .collect();
        format!(
            "<h2>Minutes per day</h2>\
             <table><tr><th>Date</th><th>Minutes</th></tr>{rows}</table>"
        )
    };

    let body = format!(
        r#"<h1>Dashboard</h1>
        <p>Total sessions: <strong>{total_sessions}</strong></p>
        <p>Total study time: <strong>{total_minutes} minutes</strong></p>
        <p>Average session: <strong>{average:.1} minutes</strong></p>
        {last_session}
        {categories}
        {daily}"#,
        total_sessions = stats.total_sessions,
        total_minutes = stats.total_minutes,
        average = stats.average_minutes,
    );

    Ok(page("Dashboard", true, &body))
}

// ── Skills ──

fn skill_form_html(action: &str, submit: &str, req: &SkillRequest, errors: Option<&FieldErrors>) -> String {
    let options: String = std::iter::once(option_tag("", "---------", req.category_slug().is_none()))
        .chain(Category::ALL.iter().map(|c| {
            option_tag(c.slug(), c.label(), req.category_slug() == Some(c.slug()))
        }))
        .collect();

    format!(
        r#"<form method="post" action="{action}">
            <label for="name">Name</label>
            <input id="name" name="name" value="{name}" maxlength="50" required>
            {name_error}
            <label for="description">Description</label>
            <textarea id="description" name="description" rows="4" required>{description}</textarea>
            {description_error}
            <label for="category">Category</label>
            <select id="category" name="category">{options}</select>
            {category_error}
            <button type="submit">{submit}</button>
        </form>"#,
        name = escape(&req.name),
        description = escape(&req.description),
        name_error = field_error(errors, "name"),
        description_error = field_error(errors, "description"),
        category_error = field_error(errors, "category"),
    )
}

pub async fn skills_page(
    State(state): State<AppState>,
    user: PageUser,
) -> Result<Html<String>, AppError> {
    let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;

    let rows: String = skills
        .iter()
        .map(|skill| {
            format!(
                r#"<tr>
                    <td>{name}</td>
                    <td>{category}</td>
                    <td><a href="/skills/{id}/edit">Edit</a></td>
                    <td><form class="inline" method="post" action="/skills/{id}/delete">
                        <button type="submit">Delete</button>
                    </form></td>
                </tr>"#,
                name = escape(&skill.name),
                category = escape(Category::label_for(skill.category.as_deref())),
                id = escape(&skill.id),
            )
        })
        .collect();

    let table = if skills.is_empty() {
        "<p class=\"muted\">No skills yet.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Name</th><th>Category</th><th></th><th></th></tr>{rows}</table>"
        )
    };

    let body = format!(
        r#"<h1>Skills</h1>
        <p><a href="/skills/new">Add a skill</a></p>
        {table}"#
    );
    Ok(page("Skills", true, &body))
}

pub async fn skill_new_page(_user: PageUser) -> Html<String> {
    let body = format!(
        "<h1>Add skill</h1>{}",
        skill_form_html("/skills/new", "Add skill", &SkillRequest::default(), None)
    );
    page("Add skill", true, &body)
}

pub async fn skill_create(
    State(state): State<AppState>,
    user: PageUser,
    Form(req): Form<SkillRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = req.validate() {
        let errors = form_errors(err)?;
        let body = format!(
            "<h1>Add skill</h1>{}",
            skill_form_html("/skills/new", "Add skill", &req, Some(&errors))
        );
        return Ok(page("Add skill", true, &body).into_response());
    }

    let id = uuid::Uuid::now_v7().to_string();
    db::skills::create_skill(
        &state.pool,
        &id,
        &user.user_id,
        req.name.trim(),
        req.description.trim(),
        req.category_slug(),
    )
    .await?;

    Ok(Redirect::to("/skills").into_response())
}

pub async fn skill_edit_page(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let skill = db::skills::get_skill(&state.pool, &user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let req = SkillRequest {
        name: skill.name,
        description: skill.description,
        category: skill.category,
    };
    let action = format!("/skills/{}/edit", skill.id);
    let body = format!(
        "<h1>Edit skill</h1>{}",
        skill_form_html(&action, "Save", &req, None)
    );
    Ok(page("Edit skill", true, &body))
}

pub async fn skill_update(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
    Form(req): Form<SkillRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = req.validate() {
        let errors = form_errors(err)?;
        let action = format!("/skills/{id}/edit");
        let body = format!(
            "<h1>Edit skill</h1>{}",
            skill_form_html(&action, "Save", &req, Some(&errors))
        );
        return Ok(page("Edit skill", true, &body).into_response());
    }

    db::skills::update_skill(
        &state.pool,
        &user.user_id,
        &id,
        req.name.trim(),
        req.description.trim(),
        req.category_slug(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Redirect::to("/skills").into_response())
}

pub async fn skill_delete(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let deleted = db::skills::delete_skill(&state.pool, &user.user_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(Redirect::to("/skills").into_response())
}

// ── Study sessions ──

fn duration_label(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes} minutes")
    } else if minutes % 60 == 0 {
        let hours = minutes / 60;
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{hours} hours")
        }
    } else {
        format!("{:.1} hours", minutes as f64 / 60.0)
    }
}

fn session_form_html(
    action: &str,
    submit: &str,
    skills: &[Skill],
    req: &SessionRequest,
    errors: Option<&FieldErrors>,
) -> String {
    let skill_options: String = std::iter::once(option_tag("", "---------", req.skill_id.is_empty()))
        .chain(
            skills
                .iter()
                .map(|skill| option_tag(&skill.id, &skill.name, skill.id == req.skill_id)),
        )
        .collect();

    let duration_options: String = DURATION_CHOICES
        .iter()
        .map(|&minutes| {
            option_tag(
                &minutes.to_string(),
                &duration_label(minutes),
                minutes == req.duration_minutes,
            )
        })
        .collect();

    format!(
        r#"<form method="post" action="{action}">
            <label for="skill_id">Skill</label>
            <select id="skill_id" name="skill_id" required>{skill_options}</select>
            {skill_error}
            <label for="date">Date of session</label>
            <input id="date" name="date" type="date" value="{date}" required>
            {date_error}
            <label for="duration_minutes">Duration of session</label>
            <select id="duration_minutes" name="duration_minutes" required>{duration_options}</select>
            {duration_error}
            <label for="notes">Notes</label>
            <textarea id="notes" name="notes" rows="3">{notes}</textarea>
            <button type="submit">{submit}</button>
        </form>"#,
        date = escape(&req.date),
        notes = escape(req.notes.as_deref().unwrap_or("")),
        skill_error = field_error(errors, "skill_id"),
        date_error = field_error(errors, "date"),
        duration_error = field_error(errors, "duration_minutes"),
    )
}

pub async fn sessions_page(
    State(state): State<AppState>,
    user: PageUser,
) -> Result<Html<String>, AppError> {
    let sessions = db::sessions::list_sessions(&state.pool, &user.user_id).await?;

    let rows: String = sessions
        .iter()
        .map(|session| {
            format!(
                r#"<tr>
                    <td>{date}</td>
                    <td>{skill}</td>
                    <td>{duration}</td>
                    <td>{notes}</td>
                    <td><a href="/sessions/{id}/edit">Edit</a></td>
                    <td><form class="inline" method="post" action="/sessions/{id}/delete">
                        <button type="submit">Delete</button>
                    </form></td>
                </tr>"#,
                date = escape(&session.date),
                skill = escape(&session.skill_name),
                duration = duration_label(session.duration_minutes),
                notes = escape(session.notes.as_deref().unwrap_or("")),
                id = escape(&session.id),
            )
        })
        .collect();

    let table = if sessions.is_empty() {
        "<p class=\"muted\">No sessions yet.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Date</th><th>Skill</th><th>Duration</th>\
             <th>Notes</th><th></th><th></th></tr>{rows}</table>"
        )
    };

    let body = format!(
        r#"<h1>Study sessions</h1>
        <p><a href="/sessions/new">Log a session</a></p>
        {table}"#
    );
    Ok(page("Sessions", true, &body))
}

pub async fn session_new_page(
    State(state): State<AppState>,
    user: PageUser,
) -> Result<Html<String>, AppError> {
    let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;
    let body = format!(
        "<h1>Log session</h1>{}",
        session_form_html("/sessions/new", "Log session", &skills, &SessionRequest::default(), None)
    );
    Ok(page("Log session", true, &body))
}

pub async fn session_create(
    State(state): State<AppState>,
    user: PageUser,
    Form(req): Form<SessionRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = super::sessions::validate_session_request(&state, &user.user_id, &req).await {
        let errors = form_errors(err)?;
        let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;
        let body = format!(
            "<h1>Log session</h1>{}",
            session_form_html("/sessions/new", "Log session", &skills, &req, Some(&errors))
        );
        return Ok(page("Log session", true, &body).into_response());
    }

    let id = uuid::Uuid::now_v7().to_string();
    db::sessions::create_session(
        &state.pool,
        &id,
        &user.user_id,
        &req.skill_id,
        &req.date,
        req.duration_minutes,
        req.notes_trimmed(),
    )
    .await?;

    Ok(Redirect::to("/sessions").into_response())
}

pub async fn session_edit_page(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let session = db::sessions::get_session(&state.pool, &user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;

    let req = SessionRequest {
        skill_id: session.skill_id,
        date: session.date,
        duration_minutes: session.duration_minutes,
        notes: session.notes,
    };
    let action = format!("/sessions/{}/edit", session.id);
    let body = format!(
        "<h1>Edit session</h1>{}",
        session_form_html(&action, "Save", &skills, &req, None)
    );
    Ok(page("Edit session", true, &body))
}

pub async fn session_update(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
    Form(req): Form<SessionRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = super::sessions::validate_session_request(&state, &user.user_id, &req).await {
        let errors = form_errors(err)?;
        let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;
        let action = format!("/sessions/{id}/edit");
        let body = format!(
            "<h1>Edit session</h1>{}",
            session_form_html(&action, "Save", &skills, &req, Some(&errors))
        );
        return Ok(page("Edit session", true, &body).into_response());
    }

    db::sessions::update_session(
        &state.pool,
        &user.user_id,
        &id,
        &req.skill_id,
        &req.date,
        req.duration_minutes,
        req.notes_trimmed(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Redirect::to("/sessions").into_response())
}

pub async fn session_delete(
    State(state): State<AppState>,
    user: PageUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let deleted = db::sessions::delete_session(&state.pool, &user.user_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(Redirect::to("/sessions").into_response())
}

// ── Profile ──

pub async fn profile_page(
    State(state): State<AppState>,
    user: PageUser,
) -> Result<Html<String>, AppError> {
    let account = db::users::find_by_id(&state.pool, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let profile = db::profiles::get_profile(&state.pool, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let skills = db::skills::list_skills(&state.pool, &user.user_id).await?;

    let bio = match profile.bio.as_deref() {
        Some(bio) => format!("<p>{}</p>", escape(bio)),
        None => "<p class=\"muted\">No bio yet.</p>".to_string(),
    };

    let address = match &profile.address {
        Some(address) => format!(
            "<h2>Address</h2><p>{}, {} {}, {}</p>",
            escape(&address.street),
            escape(&address.post_code),
            escape(&address.city),
            escape(&address.country),
        ),
        None => String::new(),
    };

    let pinned: String = skills
        .iter()
        .filter(|skill| profile.skill_ids.contains(&skill.id))
        .map(|skill| format!("<li>{}</li>", escape(&skill.name)))
        .collect();
    let pinned = if pinned.is_empty() {
        String::new()
    } else {
        format!("<h2>Skills</h2><ul>{pinned}</ul>")
    };

    let body = format!(
        r#"<h1>{username}</h1>
        <p><img src="/uploads/{picture}" alt="Profile picture" width="96"></p>
        <p class="muted">{email}</p>
        {bio}
        {address}
        {pinned}"#,
        username = escape(&account.username),
        email = escape(&account.email),
        picture = escape(&profile.profile_picture),
    );
    Ok(page("Profile", true, &body))
}

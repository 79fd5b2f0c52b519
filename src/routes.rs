use std::path::Path;

use rocket::{
    form::Form,
    fs::{FileServer, Options},
    http::{CookieJar, Status},
    response::{status::Custom, Redirect},
    serde::json::Json,
    Build, Request, Rocket, State,
};

use crate::{
    error::PollError,
    execute,
    forms::{CreateForm, NewForm, PublishForm, SubmitForm},
    history::History,
    registry::{lock, Registry},
    tally::PollKind,
    views::{AdminView, ErrorView, VoteView},
};

pub const INDEX: &str = "poll-station

GET|POST /create   key, admin_key[, number]
GET      /vote     key
GET      /admin    key, admin_key
GET|POST /submit   key, index, sha, choice...
GET|POST /new      key, admin_key, type (0 yes/no, 1 ABC, 2 ABCD, 3 choice), text, autopublish, 0..3 | options
GET|POST /publish  key, admin_key, index
";

#[get("/")]
fn index() -> &'static str {
    INDEX
}

#[get("/vote?<key>")]
fn vote(
    key: &str,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> Result<Json<VoteView>, PollError> {
    execute!({
        let station = registry.station(key)?;
        let station = lock(&station)?;
        let history = History::load(cookies);
        let view = VoteView::new(&station, history.get(key));
        Ok(Json(view))
    })
}

#[get("/admin?<key>&<admin_key>")]
fn admin(key: &str, admin_key: &str, registry: &State<Registry>) -> Result<Json<AdminView>, PollError> {
    execute!({
        let station = registry.station(key)?;
        let station = lock(&station)?;
        let view = AdminView::new(station.authorize(admin_key)?);
        Ok(Json(view))
    })
}

fn admin_redirect(key: &str, admin_key: &str) -> Redirect {
    Redirect::to(uri!(admin(key = key, admin_key = admin_key)))
}

fn create(registry: &Registry, form: CreateForm) -> Result<Redirect, PollError> {
    execute!({
        registry.create_station(&form.key, &form.admin_key, form.number.unwrap_or_default())?;
        Ok(admin_redirect(&form.key, &form.admin_key))
    })
}

#[get("/create?<form..>")]
fn create_query(form: CreateForm, registry: &State<Registry>) -> Result<Redirect, PollError> {
    create(registry, form)
}

#[post("/create", data = "<form>")]
fn create_form(form: Form<CreateForm>, registry: &State<Registry>) -> Result<Redirect, PollError> {
    create(registry, form.into_inner())
}

fn submit(registry: &Registry, form: SubmitForm, cookies: &CookieJar<'_>) -> Result<Redirect, PollError> {
    execute!({
        let station = registry.station(&form.key)?;
        let index = lock(&station)?.submit_vote(&form.sha, form.index, &form.choice)?;
        let mut history = History::load(cookies);
        history.record(&form.key, index);
        history.save(cookies);
        Ok(Redirect::to(uri!(vote(key = form.key.as_str()))))
    })
}

#[get("/submit?<form..>")]
fn submit_query(
    form: SubmitForm,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, PollError> {
    submit(registry, form, cookies)
}

#[post("/submit", data = "<form>")]
fn submit_form(
    form: Form<SubmitForm>,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, PollError> {
    submit(registry, form.into_inner(), cookies)
}

fn new_poll(registry: &Registry, form: NewForm) -> Result<Redirect, PollError> {
    execute!({
        let station = registry.station(&form.key)?;
        let mut station = lock(&station)?;
        station.authorize(&form.admin_key)?;
        let kind = PollKind::try_from(form.kind)?;
        station.add_tally(&form.admin_key, kind, &form.poll())?;
        Ok(admin_redirect(&form.key, &form.admin_key))
    })
}

#[get("/new?<form..>")]
fn new_query(form: NewForm, registry: &State<Registry>) -> Result<Redirect, PollError> {
    new_poll(registry, form)
}

#[post("/new", data = "<form>")]
fn new_form(form: Form<NewForm>, registry: &State<Registry>) -> Result<Redirect, PollError> {
    new_poll(registry, form.into_inner())
}

fn publish(registry: &Registry, form: PublishForm) -> Result<Redirect, PollError> {
    execute!({
        let station = registry.station(&form.key)?;
        let mut station = lock(&station)?;
        station.authorize(&form.admin_key)?;
        station.publish(&form.admin_key, form.index)?;
        Ok(admin_redirect(&form.key, &form.admin_key))
    })
}

#[get("/publish?<form..>")]
fn publish_query(form: PublishForm, registry: &State<Registry>) -> Result<Redirect, PollError> {
    publish(registry, form)
}

#[post("/publish", data = "<form>")]
fn publish_form(form: Form<PublishForm>, registry: &State<Registry>) -> Result<Redirect, PollError> {
    publish(registry, form.into_inner())
}

/// Requests that never reach a handler (unknown route, missing or malformed
/// parameters) get the generic view.
#[catch(default)]
fn fallback(status: Status, req: &Request<'_>) -> Custom<Json<ErrorView>> {
    tracing::warn!("{} {} -> {}", req.method(), req.uri(), status);
    let view = if status.code >= 500 {
        ErrorView::internal()
    } else {
        ErrorView::illegal()
    };
    Custom(status, Json(view))
}

pub fn mount(rocket: Rocket<Build>, registry: Registry, static_dir: &Path) -> Rocket<Build> {
    rocket
        .manage(registry)
        .mount(
            "/",
            routes![
                index,
                create_query,
                create_form,
                vote,
                admin,
                submit_query,
                submit_form,
                new_query,
                new_form,
                publish_query,
                publish_form
            ],
        )
        .mount(
            "/static",
            FileServer::new(static_dir, Options::Index | Options::Missing),
        )
        .register("/", catchers![fallback])
}

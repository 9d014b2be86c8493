//! The HTML pages served by Terrarium.

use axum::{http::StatusCode, response::Html};
use terrarium_core::{
  reading::{Reading, SubjectSummary},
  user::User,
};

use crate::html::{Cell, Chrome, Field, PageBuilder};

/// Path of the chart image for `subject`.
///
/// Uses `/plot/{subject}` rather than `/{subject}/plot.png`, which a snake
/// named `name` or `snake` cannot reach.
pub fn plot_href(subject: &str) -> String {
  format!("/plot/{}", urlencoding::encode(subject))
}

fn snake_href(subject: &str) -> String {
  format!("/snake/{}", urlencoding::encode(subject))
}

pub fn landing(chrome: &Chrome) -> Html<String> {
  let mut page = PageBuilder::new("Home", chrome);
  page
    .heading("Terrarium")
    .paragraph("Temperature readings from your snakes' terrariums.");
  match &chrome.user_name {
    Some(_) => {
      page.link_paragraph("/snakes", "See your snakes");
    }
    None => {
      page
        .paragraph("Log in to see your snakes, or register a new account.")
        .link_paragraph("/login", "Log in")
        .link_paragraph("/register", "Register");
    }
  }
  Html(page.finish())
}

/// The latest reading for one subject, with its history chart.
pub fn summary(chrome: &Chrome, subject: &str, latest: &Reading) -> Html<String> {
  let mut page = PageBuilder::new(subject, chrome);
  page
    .heading(subject)
    .paragraph(&format!("Temperature: {} °C", latest.temperature))
    .paragraph(&format!("Measured at: {}", latest.timestamp))
    .image(&plot_href(subject), &format!("Temperature history for {subject}"));
  Html(page.finish())
}

/// The caller's subjects with their newest readings.
pub fn snake_list(chrome: &Chrome, subjects: &[SubjectSummary]) -> Html<String> {
  let mut page = PageBuilder::new("My snakes", chrome);
  page.heading("My snakes");

  if subjects.is_empty() {
    page.paragraph(
      "No readings yet. Point a sensor at /sensors with your Owner_ID to get started.",
    );
  } else {
    let rows = subjects
      .iter()
      .map(|s| {
        vec![
          Cell::Link { href: snake_href(&s.subject), text: s.subject.clone() },
          Cell::Text(format!("{} °C", s.latest.temperature)),
          Cell::Text(s.latest.timestamp.clone()),
          Cell::Text(s.reading_count.to_string()),
        ]
      })
      .collect();
    page.table(&["Snake", "Temperature", "Measured at", "Readings"], rows);
  }

  Html(page.finish())
}

pub fn register(chrome: &Chrome) -> Html<String> {
  let mut page = PageBuilder::new("Register", chrome);
  page.heading("Register").form(
    "/register",
    &[
      Field::new("Name", "name", "text"),
      Field::new("Email", "email", "email"),
      Field::new("Password", "password", "password"),
    ],
    "Sign me up",
  );
  Html(page.finish())
}

pub fn login(chrome: &Chrome) -> Html<String> {
  let mut page = PageBuilder::new("Log in", chrome);
  page.heading("Log in").form(
    "/login",
    &[
      Field::new("Email", "email", "email"),
      Field::new("Password", "password", "password"),
    ],
    "Let me in",
  );
  Html(page.finish())
}

pub fn admin(
  chrome: &Chrome,
  users: &[User],
  subjects: &[SubjectSummary],
  reading_count: u64,
) -> Html<String> {
  let mut page = PageBuilder::new("Admin", chrome);
  page
    .heading("Admin")
    .paragraph(&format!("{reading_count} readings stored."));

  let user_rows = users
    .iter()
    .map(|u| {
      let owned = subjects.iter().filter(|s| s.owner == Some(u.id)).count();
      vec![
        Cell::Text(u.id.to_string()),
        Cell::Text(u.name.clone()),
        Cell::Text(u.email.clone()),
        Cell::Text(owned.to_string()),
        Cell::Text(u.created_at.format("%Y-%m-%d %H:%M").to_string()),
      ]
    })
    .collect();
  page.table(&["Id", "Name", "Email", "Snakes", "Joined"], user_rows);

  Html(page.finish())
}

pub fn error(status: StatusCode, message: &str) -> Html<String> {
  let title = status.canonical_reason().unwrap_or("Error");
  let mut page = PageBuilder::new(title, &Chrome::default());
  page
    .heading(title)
    .paragraph(message)
    .link_paragraph("/", "Back to the start page");
  Html(page.finish())
}

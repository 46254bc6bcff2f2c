//! Terminal rendering of views.
//!
//! Each function turns a view's current state into text; nothing here fetches or
//! mutates anything.

use crate::foundation::models::Song;
use crate::foundation::utils::{format_count, format_date};
use crate::routes::Route;
use crate::session::SessionState;
use crate::view::chart::{ChartDisplay, CHART_FOOTER, CHART_LOADING, EMPTY_CHART};
use crate::view::main_page::Section;
use crate::view::search::{SearchPage, NO_SONGS};
use crate::view::vtuber_detail::{VtuberDetailPage, NO_REGISTERED_SONGS};
use std::fmt::Write;

const BOLD_BLUE: &str = "\x1b[1m\x1b[34m";
const BOLD_GREEN: &str = "\x1b[1m\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

pub const MAIN_LOADING: &str = "Loading...";

/// One song as a card. Details mirror what a hovered card shows.
pub fn render_song_card(song: &Song, details: bool) -> String {
    let mut out = format!("  {BOLD_GREEN}{}{RESET}\n", song.title);
    if details {
        let _ = writeln!(out, "    Channel: {}", song.vtuber_name);
        let _ = writeln!(out, "    Views: {}", format_count(song.view_count));
        let _ = writeln!(
            out,
            "    Published: {}",
            format_date(song.published_at.as_ref())
        );
    }
    let _ = writeln!(out, "    {DIM}{}{RESET}", song.watch_url());
    out
}

pub fn render_sections(sections: Option<&[Section]>) -> String {
    let Some(sections) = sections else {
        return format!("{YELLOW}{MAIN_LOADING}{RESET}\n");
    };

    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "{BOLD_BLUE}{}{RESET}", section.title);
        if section.songs.is_empty() {
            if let Some(message) = section.empty_message {
                let _ = writeln!(out, "  {YELLOW}{}{RESET}", message);
            }
        }
        for song in &section.songs {
            out.push_str(&render_song_card(song, true));
        }
        out.push('\n');
    }
    out
}

pub fn render_chart(display: &ChartDisplay) -> String {
    match display {
        ChartDisplay::Loading => format!("{YELLOW}{CHART_LOADING}{RESET}\n"),
        ChartDisplay::Error(message) => format!("\x1b[31m{}{RESET}\n", message),
        ChartDisplay::Chart { title, entries } => {
            let mut out = format!("{BOLD_BLUE}{}{RESET}\n", title);
            if entries.is_empty() {
                let _ = writeln!(out, "  {YELLOW}{EMPTY_CHART}{RESET}");
            }
            for (rank, song) in entries.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {:>2}. {} {DIM}- {}{RESET}",
                    rank + 1,
                    song.title,
                    song.vtuber_name
                );
            }
            let _ = writeln!(out, "{DIM}{CHART_FOOTER}{RESET}");
            out
        }
    }
}

pub fn render_search(page: &SearchPage) -> String {
    let mut out = format!("{BOLD_BLUE}{}{RESET}\n\n", page.heading());

    if page.is_loading() {
        let _ = writeln!(out, "{YELLOW}{MAIN_LOADING}{RESET}");
        return out;
    }

    if page.shows_vtuber_grid() {
        let _ = writeln!(out, "{BOLD_BLUE}VTuber channels{RESET}");
        for vtuber in page.vtubers() {
            let _ = writeln!(
                out,
                "  {BOLD_GREEN}{}{RESET}  Subscribers: {}  {DIM}/vtuber/{}{RESET}",
                vtuber.name, vtuber.subscribers, vtuber.channel_id
            );
        }
        out.push('\n');
    }

    let songs = page.visible_songs();
    if songs.is_empty() {
        let _ = writeln!(out, "{YELLOW}{NO_SONGS}{RESET}");
    } else {
        for song in &songs {
            out.push_str(&render_song_card(song, true));
        }
        let _ = writeln!(
            out,
            "{DIM}Showing {} of {}{RESET}",
            songs.len(),
            page.total_songs()
        );
    }
    out
}

pub fn render_vtuber(page: &VtuberDetailPage) -> String {
    let detail = match page.detail() {
        Ok(detail) => detail,
        Err(message) => return format!("{YELLOW}{}{RESET}\n", message),
    };

    let mut out = format!("{BOLD_BLUE}{}{RESET}\n", detail.name);
    let _ = writeln!(out, "  Subscribers: {}", detail.subscribers);
    let _ = writeln!(out, "  Gender: {}", detail.gender);
    let _ = writeln!(out, "  Registered songs: {}", detail.song_count);
    let _ = writeln!(out, "  {DIM}{}{RESET}\n", page.channel_url());

    let _ = writeln!(out, "{BOLD_BLUE}Registered songs{RESET}");
    let songs = page.songs();
    if songs.is_empty() {
        let _ = writeln!(out, "  {YELLOW}{NO_REGISTERED_SONGS}{RESET}");
    }
    for (position, song) in songs.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. {BOLD_GREEN}{}{RESET}  Views: {}  Published: {}",
            position + 1,
            song.title,
            format_count(song.view_count),
            format_date(song.published_at.as_ref())
        );
    }
    out
}

pub fn render_session(state: &SessionState) -> String {
    match state {
        SessionState::Authenticated(identity) => {
            let mut out = format!("{BOLD_GREEN}Logged in as {}{RESET}\n", identity.name);
            if let Some(email) = identity.email.as_deref() {
                let _ = writeln!(out, "  {}", email);
            }
            if !identity.picture.is_empty() {
                let _ = writeln!(out, "  {DIM}{}{RESET}", identity.picture);
            }
            out
        }
        SessionState::Unauthenticated => format!("{YELLOW}Not logged in.{RESET}\n"),
    }
}

/// Pages without any fetched content. Routes backed by a view render nothing here.
pub fn render_static(route: &Route) -> Option<String> {
    let text = match route {
        Route::Privacy => format!(
            "{BOLD_BLUE}Privacy policy{RESET}\n\
             Signing in with Google shares your name, e-mail address and profile picture.\n\
             They are only used to show who is logged in and are removed when you log out.\n"
        ),
        Route::LoginSuccess => format!("{BOLD_GREEN}Login successful.{RESET}\n"),
        Route::LoginFailure => format!("\x1b[31mLogin failed. Please try again.{RESET}\n"),
        Route::NotFound => format!("\x1b[31mPage not found.{RESET}\n"),
        Route::Home | Route::Search(_) | Route::Vtuber { .. } => return None,
    };
    Some(text)
}

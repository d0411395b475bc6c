//! Application state machine.
//!
//! [`App`] owns the current page and the ticket source. It is a pure state
//! machine: it consumes [`AppEvent`]s together with the current time and
//! produces [`AppAction`]s for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Mounts the view for a page and drops the previous one, with all its
//!   reveals, banners and deadlines.
//! - Routes intents, replies and ticks to the mounted view.
//! - Collapses repeated render requests into one.

use crate::{
    AppAction, AppConfig, AppEvent, Intent, Page, Tickets, render,
    time::Moment,
    views::View,
};

/// Application state machine.
#[derive(Debug, Clone)]
pub struct App<I> {
    config: AppConfig,
    tickets: Tickets,
    page: Page,
    view: View<I>,
}

impl<I: Moment> App<I> {
    /// App showing the home page.
    pub fn new(config: AppConfig) -> Self {
        Self { config, tickets: Tickets::new(), page: Page::Home, view: View::Home }
    }

    /// Replace the current page with `page`.
    pub fn navigate(&mut self, page: Page, now: I) -> Vec<AppAction> {
        tracing::info!(from = %self.page, to = %page, "navigate");
        let (view, mut actions) = View::mount(page, &self.config, now, &mut self.tickets);
        self.page = page;
        self.view = view;
        actions.push(AppAction::Render);
        collapse_renders(actions)
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent, now: I) -> Vec<AppAction> {
        let actions = match event {
            AppEvent::Tick => self.view.tick(now, &mut self.tickets),
            AppEvent::Intent(Intent::Navigate(page)) => return self.navigate(page, now),
            AppEvent::Intent(Intent::Quit) => vec![AppAction::Quit],
            AppEvent::Intent(Intent::DismissNotice) => self.view.dismiss(),
            AppEvent::Intent(intent) => self.view.intent(intent, now, &mut self.tickets),
            AppEvent::Reply { ticket, outcome } => {
                self.view.reply(ticket, outcome, now, &mut self.tickets)
            },
        };
        collapse_renders(actions)
    }

    /// No call in flight and no scripted step pending on the current page.
    pub fn is_settled(&self) -> bool {
        self.view.is_settled()
    }

    /// Current page.
    pub fn page(&self) -> Page {
        self.page
    }

    /// State of the current page.
    pub fn view(&self) -> &View<I> {
        &self.view
    }

    /// Timing configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render the current page as HTML.
    pub fn render(&self) -> String {
        render::page(self)
    }
}

/// Keep at most one `Render`, moved to the end.
fn collapse_renders(actions: Vec<AppAction>) -> Vec<AppAction> {
    let render = actions.contains(&AppAction::Render);
    let mut out: Vec<AppAction> = actions.into_iter().filter(|a| *a != AppAction::Render).collect();
    if render {
        out.push(AppAction::Render);
    }
    out
}

//! HTML fragments for the navigation, history and quick-destination panels.
//!
//! Rendering reads snapshots only; it never touches the store. Templates are
//! compiled into the binary and auto-escaped, so destinations typed by users
//! cannot inject markup.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::types::{QuickDestination, Route, StoreSnapshot};

const NAVIGATION_TEMPLATE: &str = include_str!("templates/navigation.html");
const HISTORY_TEMPLATE: &str = include_str!("templates/history.html");
const QUICK_DESTINATIONS_TEMPLATE: &str = include_str!("templates/quick_destinations.html");

/// Route fields as shown in a panel.
#[derive(Debug, Clone, Serialize)]
struct RouteView {
    id: u64,
    destination: String,
    origin: String,
    distance_km: u32,
    eta_minutes: u32,
    /// `HH:MM` in UTC.
    started_at: String,
    status: &'static str,
    status_label: &'static str,
    status_icon: &'static str,
}

impl RouteView {
    fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.0,
            destination: route.destination.clone(),
            origin: route.origin.clone(),
            distance_km: route.distance_km,
            eta_minutes: route.eta_minutes,
            started_at: route.start_time.format("%H:%M").to_string(),
            status: route.status.as_str(),
            status_label: route.status.label(),
            status_icon: route.status.icon(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct QuickDestinationView {
    key: &'static str,
    label: &'static str,
}

/// Template engine wrapper around minijinja.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("navigation.html", NAVIGATION_TEMPLATE)
            .context("parse navigation template")?;
        env.add_template("history.html", HISTORY_TEMPLATE)
            .context("parse history template")?;
        env.add_template("quick_destinations.html", QUICK_DESTINATIONS_TEMPLATE)
            .context("parse quick destinations template")?;
        Ok(Self { env })
    }

    /// Active route card, or the idle panel when nothing is navigating.
    pub fn render_navigation(&self, current: Option<&Route>) -> Result<String> {
        let template = self.env.get_template("navigation.html")?;
        let rendered = template.render(context! {
            route => current.map(RouteView::from_route),
        })?;
        Ok(rendered)
    }

    /// History list in the order given (callers pass most recent first).
    pub fn render_history<'a>(&self, routes: impl IntoIterator<Item = &'a Route>) -> Result<String> {
        let views: Vec<RouteView> = routes.into_iter().map(RouteView::from_route).collect();
        let template = self.env.get_template("history.html")?;
        let rendered = template.render(context! { routes => views })?;
        Ok(rendered)
    }

    pub fn render_quick_destinations(&self) -> Result<String> {
        let destinations: Vec<QuickDestinationView> = QuickDestination::ALL
            .iter()
            .map(|dest| QuickDestinationView {
                key: dest.key(),
                label: dest.label(),
            })
            .collect();
        let template = self.env.get_template("quick_destinations.html")?;
        let rendered = template.render(context! { destinations => destinations })?;
        Ok(rendered)
    }

    /// Navigation followed by history, for hosts that redraw both at once.
    pub fn render_snapshot(&self, snapshot: &StoreSnapshot) -> Result<String> {
        let navigation = self.render_navigation(snapshot.current.as_ref())?;
        let history = self.render_history(&snapshot.recent)?;
        Ok(format!("{navigation}\n{history}"))
    }
}

//! Modal body templates.

use crate::dom::NodeSpec;
use crate::modal::content::{ProjectEntry, TeamEntry};

pub const PROJECT_TITLE_ID: &str = "modal-title";
pub const TEAM_TITLE_ID: &str = "team-modal-title";

fn list(items: &[&str]) -> NodeSpec {
    NodeSpec::new("ul").children(items.iter().map(|item| NodeSpec::new("li").text(*item)))
}

fn tags(items: &[&str]) -> NodeSpec {
    NodeSpec::new("div")
        .class("tag-list")
        .children(items.iter().map(|item| NodeSpec::new("span").class("tag").text(*item)))
}

pub fn project_body(project: &ProjectEntry) -> Vec<NodeSpec> {
    vec![
        NodeSpec::new("h2").attr("id", PROJECT_TITLE_ID).text(project.title),
        NodeSpec::new("p").class("modal-description").text(project.description),
        NodeSpec::new("h3").text("Key Features"),
        list(project.features),
        NodeSpec::new("h3").text("Technologies"),
        tags(project.tech),
    ]
}

/// Profile with optional "Key Projects" and "Expertise" blocks.
pub fn team_body(member: &TeamEntry) -> Vec<NodeSpec> {
    let mut body = vec![
        NodeSpec::new("h2").attr("id", TEAM_TITLE_ID).text(member.name),
        NodeSpec::new("p").class("modal-role").text(member.role),
        NodeSpec::new("p").class("modal-bio").text(member.bio),
    ];
    if !member.projects.is_empty() {
        body.push(NodeSpec::new("h3").text("Key Projects"));
        body.push(list(member.projects));
    }
    if !member.skills.is_empty() {
        body.push(NodeSpec::new("h3").text("Expertise"));
        body.push(tags(member.skills));
    }
    body
}

/// Shown for team members without a registry entry.
pub fn team_placeholder() -> Vec<NodeSpec> {
    vec![
        NodeSpec::new("h2").attr("id", TEAM_TITLE_ID).text("Team Member Profile"),
        NodeSpec::new("p").text("Detailed profile coming soon."),
    ]
}

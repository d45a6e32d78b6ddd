use crate::auth::CurrentUser;
use crate::database::models::PostSummary;

use super::badge::{Badge, BadgeVariant};
use super::{escape_html, icon, layout, Toast};

pub const HEADING: &str = "Projects Editor";
pub const SUBHEADING: &str = "Create and manage projects.";
pub const EMPTY_TITLE: &str = "No projects created";
pub const EMPTY_DESCRIPTION: &str = "You don't have any projects yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonStyle {
    Primary,
    Outline,
}

pub fn render(user: &CurrentUser, posts: &[PostSummary], toast: Option<&Toast>) -> String {
    let body = if posts.is_empty() {
        empty_placeholder()
    } else {
        let rows: String = posts.iter().map(post_item).collect();
        format!(r#"<div class="divide-y divide-border rounded-md border-white" data-post-list>{}</div>"#, rows)
    };

    let page = format!(
        r#"<div class="container grid flex-1 gap-12">
<header class="flex items-center justify-between px-2">
<div class="grid gap-1">
<h1 class="font-heading text-3xl md:text-4xl">{heading}</h1>
<p class="text-lg text-muted-foreground">{subheading}</p>
</div>
<div class="flex items-center gap-4">
<span class="text-sm text-muted-foreground" data-user>{who}</span>
{create}
<form method="post" action="/auth/signout"><button type="submit" class="text-sm underline">Sign out</button></form>
</div>
</header>
<div>{body}</div>
{toast}
</div>"#,
        heading = escape_html(HEADING),
        subheading = escape_html(SUBHEADING),
        who = escape_html(user.name.as_deref().unwrap_or(&user.email)),
        create = create_button(ButtonStyle::Primary),
        body = body,
        toast = toast.map(Toast::render).unwrap_or_default(),
    );

    layout("Dashboard", &page)
}

fn post_item(post: &PostSummary) -> String {
    let (label, variant) = if post.published {
        ("Published", BadgeVariant::Secondary)
    } else {
        ("Draft", BadgeVariant::Outline)
    };
    let badge = Badge::new(variant)
        .with_attribute("data-state", label.to_lowercase())
        .render(label);

    format!(
        r#"<div class="flex items-center justify-between p-4" data-post-id="{id}">
<div class="grid gap-1">
<span class="font-semibold">{title}</span>
<p class="text-sm text-muted-foreground">{date}</p>
</div>
<div class="flex items-center gap-2">{badge}<form method="post" action="/dashboard/posts/{id}/delete"><button type="submit" class="text-sm text-destructive">Delete</button></form></div>
</div>"#,
        id = post.id,
        title = escape_html(&post.title),
        date = post.created_at.format("%B %-d, %Y"),
        badge = badge,
    )
}

fn empty_placeholder() -> String {
    format!(
        r#"<div class="flex min-h-[400px] flex-col items-center justify-center rounded-md border border-dashed p-8 text-center bg-[#212121]" data-empty-placeholder>
<div class="flex h-20 w-20 items-center justify-center rounded-full bg-muted">{icon}</div>
<h2 class="mt-6 text-xl font-semibold">{title}</h2>
<p class="mb-8 mt-2 text-center text-sm font-normal leading-6 text-white">{description}</p>
{create}
</div>"#,
        icon = icon("post", "h-10 w-10"),
        title = escape_html(EMPTY_TITLE),
        description = escape_html(EMPTY_DESCRIPTION),
        create = create_button(ButtonStyle::Outline),
    )
}

fn create_button(style: ButtonStyle) -> String {
    let class = match style {
        ButtonStyle::Primary => "inline-flex items-center rounded-md bg-primary px-4 py-2 text-sm font-medium text-primary-foreground",
        ButtonStyle::Outline => "inline-flex items-center rounded-md border border-input px-4 py-2 text-sm font-medium",
    };
    format!(
        r#"<form method="post" action="/dashboard/posts"><button type="submit" class="{}" data-create-post>{}New post</button></form>"#,
        class,
        icon("add", "mr-2 h-4 w-4"),
    )
}

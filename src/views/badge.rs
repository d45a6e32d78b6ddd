use std::fmt;
use std::str::FromStr;

use super::escape_html;

const BASE_CLASS: &str = "inline-flex items-center border rounded-full px-2.5 py-0.5 text-xs font-semibold transition-colors focus:outline-none focus:ring-2 focus:ring-ring focus:ring-offset-2";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    #[default]
    Default,
    Easy,
    EasyLarge,
    Medium,
    Hard,
    Secondary,
    Destructive,
    Outline,
}

impl BadgeVariant {
    pub const ALL: [BadgeVariant; 8] = [
        BadgeVariant::Default,
        BadgeVariant::Easy,
        BadgeVariant::EasyLarge,
        BadgeVariant::Medium,
        BadgeVariant::Hard,
        BadgeVariant::Secondary,
        BadgeVariant::Destructive,
        BadgeVariant::Outline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "default",
            BadgeVariant::Easy => "easy",
            BadgeVariant::EasyLarge => "easy_large",
            BadgeVariant::Medium => "medium",
            BadgeVariant::Hard => "hard",
            BadgeVariant::Secondary => "secondary",
            BadgeVariant::Destructive => "destructive",
            BadgeVariant::Outline => "outline",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "bg-primary hover:bg-primary/80 border-transparent text-primary-foreground",
            BadgeVariant::Easy => "mr-[0px] bg-green-500 hover:bg-[white]/80 border-transparent text-primary-foreground",
            BadgeVariant::EasyLarge => "mr-[0px] w-[136px] text-[23px] h-[61px] flex items-center justify-center bg-green-500 hover:bg-[white]/80 border-transparent text-primary-foreground",
            BadgeVariant::Medium => "mr-[0px] bg-yellow-500 hover:bg-[white]/80 border-transparent text-primary-foreground",
            BadgeVariant::Hard => "mr-[0px] bg-red-500 hover:bg-[white]/80 border-transparent text-primary-foreground",
            BadgeVariant::Secondary => "bg-secondary hover:bg-secondary/80 border-transparent text-secondary-foreground",
            BadgeVariant::Destructive => "bg-destructive hover:bg-destructive/80 border-transparent text-destructive-foreground",
            BadgeVariant::Outline => "text-foreground",
        }
    }

    /// Unknown or missing names fall back to [`BadgeVariant::Default`].
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for BadgeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| format!("unknown badge variant: {}", s))
    }
}

impl fmt::Display for BadgeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless label. Extra attributes pass through untouched apart from escaping.
#[derive(Debug, Clone, Default)]
pub struct Badge {
    pub variant: BadgeVariant,
    pub class_name: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl Badge {
    pub fn new(variant: BadgeVariant) -> Self {
        Self { variant, ..Default::default() }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn class(&self) -> String {
        let mut class = format!("{} {}", BASE_CLASS, self.variant.class());
        if let Some(extra) = self.class_name.as_deref().filter(|c| !c.is_empty()) {
            class.push(' ');
            class.push_str(extra);
        }
        class
    }

    pub fn render(&self, label: &str) -> String {
        let attributes: String = self
            .attributes
            .iter()
            .filter(|(name, _)| is_attribute_name(name) && name != "class")
            .map(|(name, value)| format!(r#" {}="{}""#, name, escape_html(value)))
            .collect();

        format!(
            r#"<div class="{}"{}>{}</div>"#,
            escape_html(&self.class()),
            attributes,
            escape_html(label)
        )
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

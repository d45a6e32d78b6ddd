//! Registration / login form.
//!
//! Each of the three sign-in actions tracks its own state. Loading flags
//! decide which controls are disabled and which show a spinner.
//!
//! A server response always carries a settled state (idle, succeeded or
//! failed). The submitting state is painted in the browser by
//! `LOADING_SCRIPT`; the loading branches of the renderer describe the same
//! markup the script produces.

use crate::auth::provider::Provider;
use crate::validation::FieldErrors;

use super::{escape_html, icon, layout, Toast};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Email,
    GitHub,
    Google,
}

impl ActionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Submitting => "submitting",
            ActionState::Succeeded => "succeeded",
            ActionState::Failed => "failed",
        }
    }
}

impl From<Provider> for AuthAction {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Email => AuthAction::Email,
            Provider::GitHub => AuthAction::GitHub,
            Provider::Google => AuthAction::Google,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub email: ActionState,
    pub github: ActionState,
    pub google: ActionState,
}

impl AuthFormState {
    fn slot(&mut self, action: AuthAction) -> &mut ActionState {
        match action {
            AuthAction::Email => &mut self.email,
            AuthAction::GitHub => &mut self.github,
            AuthAction::Google => &mut self.google,
        }
    }

    pub fn state(&self, action: AuthAction) -> ActionState {
        match action {
            AuthAction::Email => self.email,
            AuthAction::GitHub => self.github,
            AuthAction::Google => self.google,
        }
    }

    pub fn begin(&mut self, action: AuthAction) {
        *self.slot(action) = ActionState::Submitting;
    }

    pub fn finish(&mut self, action: AuthAction, ok: bool) {
        let slot = self.slot(action);
        if *slot == ActionState::Submitting {
            *slot = if ok { ActionState::Succeeded } else { ActionState::Failed };
        }
    }

    pub fn is_loading(&self, action: AuthAction) -> bool {
        self.state(action) == ActionState::Submitting
    }

    pub fn email_input_disabled(&self) -> bool {
        self.is_loading(AuthAction::Email) || self.is_loading(AuthAction::GitHub)
    }

    /// A control is disabled while its own action or an earlier one is
    /// loading. A loading Google action leaves GitHub enabled.
    pub fn button_disabled(&self, action: AuthAction) -> bool {
        match action {
            AuthAction::Email => self.is_loading(AuthAction::Email),
            AuthAction::GitHub => self.is_loading(AuthAction::Email) || self.is_loading(AuthAction::GitHub),
            AuthAction::Google => {
                self.is_loading(AuthAction::Email)
                    || self.is_loading(AuthAction::GitHub)
                    || self.is_loading(AuthAction::Google)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn path(&self) -> &'static str {
        match self {
            AuthMode::Login => "/login",
            AuthMode::Register => "/register",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Create an account",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Register => "Sign Up",
        }
    }

    fn switch_link(&self) -> (&'static str, &'static str) {
        match self {
            AuthMode::Login => ("/register", "Don't have an account? Sign up."),
            AuthMode::Register => ("/login", "Already have an account? Log in."),
        }
    }
}

/// Everything needed to render the form once.
#[derive(Debug, Clone)]
pub struct AuthFormView<'a> {
    pub mode: AuthMode,
    pub state: AuthFormState,
    pub email: &'a str,
    pub from: Option<&'a str>,
    pub errors: &'a FieldErrors,
    pub toast: Option<Toast>,
}

pub fn render(view: &AuthFormView<'_>) -> String {
    let verb = view.mode.verb();
    let state = &view.state;

    let email_error = view
        .errors
        .get("email")
        .map(|msg| format!(r#"<p class="px-1 text-xs text-red-600" data-field-error="email">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    let from_input = view
        .from
        .map(|from| format!(r#"<input type="hidden" name="from" value="{}">"#, escape_html(from)))
        .unwrap_or_default();

    let (switch_href, switch_text) = view.mode.switch_link();

    let body = format!(
        r#"<div class="container flex h-screen w-screen flex-col items-center justify-center">
<div class="mx-auto flex w-full flex-col justify-center space-y-6 sm:w-[350px]">
<h1 class="text-2xl font-semibold tracking-tight text-center">{title}</h1>
<div class="grid gap-6" data-auth-form>
<form method="post" action="{action}" data-email-form>
<div class="grid gap-2">
<div class="grid gap-1">
<label class="sr-only" for="email">Email</label>
<input class="h-[65px] bg-[#d9d9d9]" id="email" name="email" placeholder="name@example.com" type="email" autocapitalize="none" autocomplete="email" autocorrect="off" value="{email}"{input_disabled}>
{email_error}
</div>
{from_input}
<button type="submit" class="btn-default-dark" data-action="email" data-state="{email_state}"{email_disabled}>{email_spinner}{verb} with Email</button>
</div>
</form>
<p class="px-1 text-center text-sm text-muted-foreground"><a href="{switch_href}" class="hover:text-brand underline underline-offset-4">{switch_text}</a></p>
<div class="relative"><div class="absolute inset-0 flex items-center"><span class="w-full border-t"></span></div><div class="relative flex justify-center text-xs uppercase"><span class="bg-background px-2 text-muted-foreground">{divider}</span></div></div>
<div class="flex justify-center space-x-4">
{github}
{google}
</div>
</div>
{toast}
</div>
</div>
<script>{script}</script>"#,
        title = escape_html(view.mode.title()),
        action = view.mode.path(),
        email = escape_html(view.email),
        input_disabled = disabled_attr(state.email_input_disabled()),
        email_error = email_error,
        from_input = from_input,
        email_state = state.email.as_str(),
        email_disabled = disabled_attr(state.button_disabled(AuthAction::Email)),
        email_spinner = if state.is_loading(AuthAction::Email) { icon("spinner", "mr-2 h-4 w-4 animate-spin") } else { String::new() },
        verb = verb,
        switch_href = switch_href,
        switch_text = escape_html(switch_text),
        divider = format!("{} WITH", verb.to_uppercase()),
        github = provider_button(state, Provider::GitHub, "github", "GitHub", verb, view.from),
        google = provider_button(state, Provider::Google, "chrome", "Google", verb, view.from),
        toast = view.toast.as_ref().map(Toast::render).unwrap_or_default(),
        script = LOADING_SCRIPT,
    );

    layout(view.mode.title(), &body)
}

fn provider_button(
    state: &AuthFormState,
    provider: Provider,
    icon_name: &str,
    label: &str,
    verb: &str,
    from: Option<&str>,
) -> String {
    let action = AuthAction::from(provider);
    let mut href = format!("/login/{}", provider.as_str());
    if let Some(from) = from {
        href.push_str("?from=");
        href.push_str(&url::form_urlencoded::byte_serialize(from.as_bytes()).collect::<String>());
    }

    let content = if state.is_loading(action) {
        icon("spinner", "mr-2 h-[61px] w-[61px] animate-spin")
    } else {
        icon(icon_name, "mr-2 h-[61px] w-[61px]")
    };

    format!(
        r#"<a href="{href}" class="btn-ghost-no-hover" data-action="{name}" data-state="{action_state}" title="{verb} with {label}." aria-disabled="{disabled}">{content}</a>"#,
        href = escape_html(&href),
        name = provider.as_str(),
        action_state = state.state(action).as_str(),
        verb = verb,
        label = label,
        disabled = state.button_disabled(action),
        content = content,
    )
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

/// Mirrors the server-side disable rules while a request is in flight.
const LOADING_SCRIPT: &str = r#"(function(){
var form=document.querySelector('[data-email-form]');
var email=form.querySelector('input[name=email]');
var emailButton=form.querySelector('[data-action=email]');
var github=document.querySelector('[data-action=github]');
var google=document.querySelector('[data-action=google]');
function block(el){el.setAttribute('aria-disabled','true');el.setAttribute('data-state','submitting');el.addEventListener('click',function(e){e.preventDefault();});}
form.addEventListener('submit',function(){emailButton.disabled=true;emailButton.setAttribute('data-state','submitting');block(github);block(google);});
github.addEventListener('click',function(){email.readOnly=true;block(github);block(google);});
google.addEventListener('click',function(){block(google);});
})();"#;

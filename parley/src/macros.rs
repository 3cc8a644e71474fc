/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use parley::{Role, parley_msg};
///
/// let message = parley_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! parley_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::System, $content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use parley::{Role, parley_messages};
///
/// let messages = parley_messages![
///     system => "You are concise.",
///     user => "What is 1+1?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! parley_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::parley_msg!($role => $content)),+]
    };
}

/// Creates a [`Session`](crate::Session) with an optional system prompt and options.
///
/// ```rust
/// use parley::{Options, parley_session};
///
/// let bare = parley_session!("gpt-3.5-turbo");
/// assert!(bare.messages().is_empty());
///
/// let seeded = parley_session!("gpt-3.5-turbo", "Be concise.");
/// assert_eq!(seeded.messages().len(), 1);
///
/// let tuned = parley_session!("gpt-3.5-turbo", "", Options::new().with_temperature(0.2));
/// assert_eq!(tuned.options.temperature, Some(0.2));
/// ```
#[macro_export]
macro_rules! parley_session {
    ($model:expr $(,)?) => {
        $crate::Session::create($model, "", None)
    };
    ($model:expr, $system_prompt:expr $(,)?) => {
        $crate::Session::create($model, $system_prompt, None)
    };
    ($model:expr, $system_prompt:expr, $options:expr $(,)?) => {
        $crate::Session::create($model, $system_prompt, Some($options))
    };
}

#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __or_default {
    ($default:expr) => {
        $default
    };
    ($default:expr, $value:expr) => {
        $value
    };
}

/// Declare a [`Command`](crate::engine::Command).
///
/// Expands to a `Result<Command<_>, GrammarError>`: the open (and optional
/// end) pattern is compiled on the spot, so a malformed pattern is reported
/// while the registry is being built.
///
/// ```ignore
/// command! {
///     name: "at player",
///     pattern: [Atom::start(), Atom::lit("@"), Atom::capture("PLAYER", PLAYER_CODE), Atom::end()],
///     passes: Passes::From(2),
///     action: |diagram: &mut TimingDiagram, inv| { ... }
/// }
/// ```
#[macro_export]
macro_rules! command {
    (
        name: $name:literal,
        pattern: [ $($atom:expr),* $(,)? ]
        $(, end: [ $($end_atom:expr),* $(,)? ])?
        $(, strategy: $strategy:expr)?
        $(, passes: $passes:expr)?
        , action: |$diagram:ident : &mut $diag_ty:ty, $inv:ident| $body:block
        $(,)?
    ) => {{
        (|| -> ::std::result::Result<$crate::engine::Command<$diag_ty>, $crate::engine::GrammarError> {
            let open = $crate::engine::Pattern::new($name, ::std::vec![ $($atom),* ])?;
            let end: ::std::option::Option<$crate::engine::Pattern> = $crate::__or_default!(
                ::std::option::Option::None
                $(, ::std::option::Option::Some($crate::engine::Pattern::new(
                    ::std::concat!($name, " [end]"),
                    ::std::vec![ $($end_atom),* ],
                )?))?
            );
            let strategy = $crate::__or_default!($crate::engine::BlockStrategy::KEEP $(, $strategy)?);
            let passes = $crate::__or_default!($crate::engine::Passes::Every $(, $passes)?);

            let command = $crate::engine::Command::single(
                $name,
                open,
                move |$diagram: &mut $diag_ty,
                      $inv: &$crate::engine::Invocation<'_>|
                      -> $crate::engine::CommandResult { $body },
            );
            let command = match end {
                ::std::option::Option::Some(end) => command.with_block(end, strategy),
                ::std::option::Option::None => command,
            };
            ::std::result::Result::Ok(command.active_on(passes))
        })()
    }};
}

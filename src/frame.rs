//! The speculative parsing frame stack.

use crate::{
    context::{Context, Global},
    token::Token,
};

/// Internal signal raised when the current speculative parsing route turns
/// out to be invalid.
///
/// Always caught by the nearest speculative caller (`parse_template`,
/// `parse_heading`, `parse_entity`) and translated into a literal-text
/// fallback; never escapes [`crate::tokenize`].
#[derive(Debug)]
pub(crate) struct BadRoute;

/// The result of an operation that can fail its speculative route.
pub(crate) type PResult<T> = Result<T, BadRoute>;

/// One entry on the frame stack: a speculative route's accumulated tokens,
/// its parsing context, and its pending text.
#[derive(Debug, Default)]
struct Frame {
    tokens: Vec<Token>,
    context: Context,
    textbuf: String,
}

impl Frame {
    fn new(context: Context) -> Self {
        Self {
            tokens: Vec::new(),
            context,
            textbuf: String::new(),
        }
    }

    /// Flushes the text buffer into a single `Text` token, if non-empty.
    fn flush_text(&mut self) {
        if !self.textbuf.is_empty() {
            self.tokens.push(Token::Text(core::mem::take(&mut self.textbuf)));
        }
    }
}

/// The stack of parsing frames, plus the process-wide global context.
#[derive(Debug)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
    global: Global,
    max_depth: usize,
}

impl FrameStack {
    /// Creates an empty frame stack that refuses to push past `max_depth`
    /// frames.
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            global: Global::empty(),
            max_depth,
        }
    }

    pub(crate) fn global(&self) -> Global {
        self.global
    }

    pub(crate) fn set_global(&mut self, global: Global) {
        self.global = global;
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("parse() keeps the stack non-empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("parse() keeps the stack non-empty")
    }

    pub(crate) fn context(&self) -> Context {
        self.top().context
    }

    pub(crate) fn set_context(&mut self, context: Context) {
        self.top_mut().context = context;
    }

    /// Opens a new speculative route. Fails the route immediately, without
    /// pushing, if doing so would exceed the configured depth limit.
    pub(crate) fn push(&mut self, context: Context) -> PResult<()> {
        if self.frames.len() >= self.max_depth {
            log::debug!(
                "refusing to nest past the configured max_depth of {}",
                self.max_depth
            );
            return Err(BadRoute);
        }
        self.frames.push(Frame::new(context));
        log::trace!("pushed frame {context:?} (depth {})", self.frames.len());
        Ok(())
    }

    /// Closes the current route successfully, returning its tokens.
    pub(crate) fn pop(&mut self) -> Vec<Token> {
        let mut frame = self.frames.pop().expect("parse() keeps the stack non-empty");
        frame.flush_text();
        log::trace!("popped frame (depth {})", self.frames.len());
        frame.tokens
    }

    /// Discards the current route and returns the signal for the caller to
    /// propagate.
    pub(crate) fn fail_route(&mut self) -> BadRoute {
        self.frames.pop();
        log::trace!("failed route (depth {})", self.frames.len());
        BadRoute
    }

    /// Appends to the current frame's pending text.
    pub(crate) fn write_text(&mut self, text: &str) {
        self.top_mut().textbuf.push_str(text);
    }

    /// Flushes pending text, then appends a token.
    pub(crate) fn write(&mut self, token: Token) {
        let frame = self.top_mut();
        frame.flush_text();
        frame.tokens.push(token);
    }

    /// Merges a returned sub-frame's tokens into the current frame.
    ///
    /// If the first token is `Text`, it is merged into the pending text
    /// buffer (rather than appended as-is) so that it can coalesce with
    /// whatever text the current frame was already accumulating, preserving
    /// the no-adjacent-`Text` invariant across frame boundaries.
    pub(crate) fn write_all(&mut self, mut tokens: Vec<Token>) {
        if matches!(tokens.first(), Some(Token::Text(_))) {
            if let Token::Text(text) = tokens.remove(0) {
                self.write_text(&text);
            }
        }
        let frame = self.top_mut();
        frame.flush_text();
        frame.tokens.extend(tokens);
    }

    /// Returns the concatenation of every `Text` token currently in the
    /// frame, after flushing pending text into one.
    ///
    /// Used only by template name verification, which needs to inspect the
    /// accumulated name text without consuming it.
    pub(crate) fn concat_text(&mut self) -> String {
        self.top_mut().flush_text();
        self.top()
            .tokens
            .iter()
            .filter_map(|token| match token {
                Token::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

//! The recursive, backtracking tokenizer core.

use crate::{
    context::{Context, Global},
    cursor::{Cursor, Peek},
    entities,
    frame::{BadRoute, FrameStack, PResult},
    token::Token,
    TokenizerConfig,
};

/// Tokenizes `text` using the default [`TokenizerConfig`].
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_config(text, &TokenizerConfig::default())
}

/// Tokenizes `text`, bounding the speculative frame stack to
/// `config.max_depth`.
///
/// This never fails: malformed or pathologically nested constructs degrade
/// to literal text rather than producing an error.
#[must_use]
pub fn tokenize_with_config(text: &str, config: &TokenizerConfig) -> Vec<Token> {
    let mut tokenizer = Tokenizer {
        cursor: Cursor::new(text),
        stack: FrameStack::new(config.max_depth.max(1)),
        resolved_heading_level: 0,
    };
    match tokenizer.parse(Context::empty()) {
        Ok(tokens) => tokens,
        // Only reachable if `max_depth` is configured so low that even the
        // top-level frame cannot be pushed; treat the whole input as literal.
        Err(BadRoute) => vec![Token::Text(text.to_string())],
    }
}

/// Holds the mutable state of a single `tokenize` call: the input cursor,
/// the frame stack, and a scratch register used to thread a heading's
/// resolved level back out of its recursive `parse` call (see
/// `handle_heading_end`).
struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    stack: FrameStack,
    resolved_heading_level: u8,
}

impl<'a> Tokenizer<'a> {
    /// Reads the segment at the cursor head, failing the current route if
    /// the input has already ended.
    fn read_strict(&mut self) -> PResult<Peek<'a>> {
        match self.cursor.peek(0) {
            Peek::End => Err(self.stack.fail_route()),
            other => Ok(other),
        }
    }

    /// Parses wikicode until `context`'s terminator is reached or the input
    /// ends, returning the tokens collected in this frame.
    fn parse(&mut self, context: Context) -> PResult<Vec<Token>> {
        self.stack.push(context)?;
        loop {
            let this = self.cursor.peek(0);

            if let Peek::Segment(text) = this {
                if !this.is_marker_or_end() {
                    self.stack.write_text(text);
                    self.cursor.step(1);
                    continue;
                }
            }

            if matches!(this, Peek::End) {
                if self.stack.context().intersects(Context::TEMPLATE | Context::HEADING) {
                    return Err(self.stack.fail_route());
                }
                return Ok(self.stack.pop());
            }

            let prev = self.cursor.peek(-1);
            let next = self.cursor.peek(1);
            let context = self.stack.context();

            if this.is_char('{') && next.is_char('{') {
                self.parse_template()?;
            } else if this.is_char('|') && context.intersects(Context::TEMPLATE) {
                self.handle_template_param()?;
            } else if this.is_char('=') && context.contains(Context::TEMPLATE_PARAM_KEY) {
                self.handle_template_param_value();
            } else if this.is_char('}') && next.is_char('}') && context.intersects(Context::TEMPLATE) {
                return self.handle_template_end();
            } else if (matches!(prev, Peek::Start) || prev.is_char('\n'))
                && this.is_char('=')
                && !self.stack.global().contains(Global::HEADING)
            {
                self.parse_heading()?;
            } else if this.is_char('=') && context.intersects(Context::HEADING) {
                return self.handle_heading_end();
            } else if this.is_char('\n') && context.intersects(Context::HEADING) {
                return Err(self.stack.fail_route());
            } else if this.is_char('&') {
                self.parse_entity()?;
            } else {
                let text = this.as_str().expect("non-End dispatch always sees a segment");
                self.stack.write_text(text);
            }

            self.cursor.step(1);
        }
    }

    /// Parses a template at the cursor head (which must be sitting on the
    /// first of a `{{` pair).
    fn parse_template(&mut self) -> PResult<()> {
        let reset = self.cursor.head();
        self.cursor.step(2);
        match self.parse(Context::TEMPLATE_NAME) {
            Err(BadRoute) => {
                self.cursor.set_head(reset);
                self.stack.write_text("{");
            }
            Ok(template) => {
                self.stack.write(Token::TemplateOpen);
                self.stack.write_all(template);
                self.stack.write(Token::TemplateClose);
            }
        }
        Ok(())
    }

    /// Fails the route if the template name accumulated so far contains a
    /// newline that is not purely leading or trailing whitespace.
    fn verify_template_name(&mut self) -> PResult<()> {
        let text = self.stack.concat_text();
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.contains('\n') {
            return Err(self.stack.fail_route());
        }
        Ok(())
    }

    /// Handles a `|` inside a template: ends the name or previous value
    /// phase and begins a new parameter key.
    fn handle_template_param(&mut self) -> PResult<()> {
        let mut context = self.stack.context();
        if context.contains(Context::TEMPLATE_NAME) {
            self.verify_template_name()?;
            context.remove(Context::TEMPLATE_NAME);
        }
        context.remove(Context::TEMPLATE_PARAM_VALUE);
        context.insert(Context::TEMPLATE_PARAM_KEY);
        self.stack.set_context(context);
        self.stack.write(Token::TemplateParamSeparator);
        Ok(())
    }

    /// Handles a `=` inside a template parameter key: begins the value
    /// phase.
    fn handle_template_param_value(&mut self) {
        let mut context = self.stack.context();
        context.remove(Context::TEMPLATE_PARAM_KEY);
        context.insert(Context::TEMPLATE_PARAM_VALUE);
        self.stack.set_context(context);
        self.stack.write(Token::TemplateParamEquals);
    }

    /// Handles the `}}` that closes a template.
    fn handle_template_end(&mut self) -> PResult<Vec<Token>> {
        if self.stack.context().contains(Context::TEMPLATE_NAME) {
            self.verify_template_name()?;
        }
        self.cursor.step(1);
        Ok(self.stack.pop())
    }

    /// Parses a section heading at the cursor head (which must be sitting on
    /// a line-initial `=`, with no heading currently open).
    fn parse_heading(&mut self) -> PResult<()> {
        let mut global = self.stack.global();
        global.insert(Global::HEADING);
        self.stack.set_global(global);

        let reset = self.cursor.head();
        self.cursor.step(1);
        let mut best = 1usize;
        while self.cursor.peek(0).is_char('=') {
            best += 1;
            self.cursor.step(1);
        }
        let context = Context::heading_level(best);

        match self.parse(context) {
            Err(BadRoute) => {
                self.cursor.set_head(reset + best - 1);
                self.stack.write_text(&"=".repeat(best));
            }
            Ok(title) => {
                let level = self.resolved_heading_level;
                self.stack.write(Token::HeadingStart { level });
                if usize::from(level) < best {
                    self.stack.write_text(&"=".repeat(best - usize::from(level)));
                }
                self.stack.write_all(title);
                self.stack.write(Token::HeadingEnd);
            }
        }

        let mut global = self.stack.global();
        global.remove(Global::HEADING);
        self.stack.set_global(global);
        Ok(())
    }

    /// Handles a `=` inside a heading frame: looks ahead for a longer,
    /// later run of `=` that would make a better terminator before settling
    /// for this one.
    fn handle_heading_end(&mut self) -> PResult<Vec<Token>> {
        let reset = self.cursor.head();
        self.cursor.step(1);
        let mut best = 1usize;
        while self.cursor.peek(0).is_char('=') {
            best += 1;
            self.cursor.step(1);
        }
        let context = self.stack.context();
        let current = context.level();
        let level = current.min(u8::try_from(best.min(6)).expect("clamped to <= 6"));

        match self.parse(context) {
            Err(BadRoute) => {
                if usize::from(level) < best {
                    self.stack.write_text(&"=".repeat(best - usize::from(level)));
                }
                self.cursor.set_head(reset + best - 1);
                self.resolved_heading_level = level;
                Ok(self.stack.pop())
            }
            Ok(after) => {
                self.stack.write_text(&"=".repeat(best));
                self.stack.write_all(after);
                // `self.resolved_heading_level` was already set by whichever
                // nested `handle_heading_end` call actually terminated this
                // chain; it propagates through unchanged.
                Ok(self.stack.pop())
            }
        }
    }

    /// Parses an HTML entity at the cursor head (which must be sitting on
    /// `&`).
    fn parse_entity(&mut self) -> PResult<()> {
        let reset = self.cursor.head();
        self.stack.push(Context::empty())?;
        match self.really_parse_entity() {
            Err(BadRoute) => {
                self.cursor.set_head(reset);
                self.stack.write_text("&");
            }
            Ok(()) => {
                let tokens = self.stack.pop();
                self.stack.write_all(tokens);
            }
        }
        Ok(())
    }

    /// Validates and tokenizes the body of an HTML entity reference.
    fn really_parse_entity(&mut self) -> PResult<()> {
        self.stack.write(Token::HTMLEntityStart);
        self.cursor.step(1);

        let first = self.read_strict()?;
        let numeric;
        let hexadecimal;
        let payload: &str;

        if first.is_char('#') {
            numeric = true;
            self.stack.write(Token::HTMLEntityNumeric);
            self.cursor.step(1);

            let rest = self.read_strict()?;
            let rest_text = rest.as_str().expect("strict read always yields a segment");
            let lead = rest_text.chars().next().expect("segments are never empty");
            if lead == 'x' || lead == 'X' {
                hexadecimal = true;
                self.stack.write(Token::HTMLEntityHex { char: lead });
                let trimmed = &rest_text[lead.len_utf8()..];
                if trimmed.is_empty() {
                    return Err(self.stack.fail_route());
                }
                payload = trimmed;
            } else {
                hexadecimal = false;
                payload = rest_text;
            }
        } else {
            numeric = false;
            hexadecimal = false;
            payload = first.as_str().expect("strict read always yields a segment");
        }

        let valid = if hexadecimal {
            payload.chars().all(|c| c.is_ascii_hexdigit())
        } else if numeric {
            payload.chars().all(|c| c.is_ascii_digit())
        } else {
            payload.chars().all(|c| c.is_ascii_alphanumeric())
        };
        if !valid {
            return Err(self.stack.fail_route());
        }

        self.cursor.step(1);
        if !self.cursor.peek(0).is_char(';') {
            return Err(self.stack.fail_route());
        }

        if numeric {
            let radix = if hexadecimal { 16 } else { 10 };
            let value = match u32::from_str_radix(payload, radix) {
                Ok(value) => value,
                Err(_) => return Err(self.stack.fail_route()),
            };
            if value < 1 || value > 0x0010_FFFF {
                return Err(self.stack.fail_route());
            }
        } else if !entities::is_named_entity(payload) {
            return Err(self.stack.fail_route());
        }

        self.stack.write(Token::Text(payload.to_string()));
        self.stack.write(Token::HTMLEntityEnd);
        Ok(())
    }
}

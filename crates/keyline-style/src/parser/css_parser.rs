//! CSS syntax parsing using the `cssparser` crate.
//!
//! This reader produces the same record shape a live CSS object model would
//! deliver: style rules with resolved, comma-joined animation/transition
//! sub-property strings, and keyframes rules with their ordered stops. Only
//! the animation/transition property family is interpreted; everything else
//! passes through untouched (keyframe payload) or is skipped (irrelevant
//! style declarations, other at-rules).

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use crate::parser::shorthand::{expand_animation, expand_transition};
use crate::source::{CssRuleSource, KeyframeSource, KeyframesSource, StyleRuleSource};
use crate::{Error, Result};

/// Parse a CSS stylesheet string into timeline-relevant rule records.
///
/// Returns style rules that declare animations or transitions, plus all
/// `@keyframes` rules, in source order. Rules without animation content are
/// dropped here — the extractor would ignore them anyway.
///
/// # Error Recovery
///
/// Parse errors in individual rules do not fail the whole parse. The reader
/// logs the error via `tracing::warn!`, skips past the offending rule's
/// block, and continues — the source is routinely broken mid-edit, and a
/// half-typed rule must not take out the rest of the stylesheet.
pub fn parse_stylesheet(css: &str) -> Result<Vec<CssRuleSource>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        match parse_rule(&mut parser) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("CSS parse error: {}", error);
                skip_to_next_rule(&mut parser);
            }
        }
    }

    Ok(rules)
}

/// Parse a single top-level rule, dispatching on `@keyframes`.
fn parse_rule<'i>(parser: &mut Parser<'i, '_>) -> Result<Option<CssRuleSource>> {
    let state = parser.state();
    let token = match parser.next() {
        Ok(token) => token.clone(),
        Err(_) => return Ok(None),
    };

    if let Token::AtKeyword(name) = &token {
        if name.eq_ignore_ascii_case("keyframes") || name.eq_ignore_ascii_case("-webkit-keyframes")
        {
            return parse_keyframes_rule(parser).map(Some);
        }
        // Other at-rules carry nothing the timeline reads; skip prelude and
        // block (or the terminating ';' for block-less rules like @import).
        skip_to_next_rule(parser);
        return Ok(None);
    }

    parser.reset(&state);
    parse_style_rule(parser)
}

/// Parse `selector { declarations }` into a style-rule record.
///
/// Returns `Ok(None)` when the rule parses fine but declares no animation or
/// transition.
fn parse_style_rule<'i>(parser: &mut Parser<'i, '_>) -> Result<Option<CssRuleSource>> {
    let location = parser.current_source_location();

    let selector_start = parser.position();
    parser
        .parse_until_before(Delimiter::CurlyBracketBlock, |prelude| {
            while prelude.next_including_whitespace().is_ok() {}
            Ok::<_, CssParseError<'_, ()>>(())
        })
        .map_err(|e: CssParseError<'_, ()>| {
            Error::parse(
                format!("Failed to parse selector: {:?}", e),
                location.line,
                location.column,
            )
        })?;
    let selector = parser.slice_from(selector_start).trim().to_string();

    if selector.is_empty() {
        return Err(Error::parse(
            "Empty selector".to_string(),
            location.line,
            location.column,
        ));
    }

    let declarations = match parser.next() {
        Ok(Token::CurlyBracketBlock) => {
            parser
                .parse_nested_block(parse_declaration_list)
                .map_err(|e: CssParseError<'_, ()>| {
                    Error::parse(
                        format!("Failed to parse declaration block: {:?}", e),
                        location.line,
                        location.column,
                    )
                })?
        }
        _ => {
            return Err(Error::parse(
                "Expected '{' after selector".to_string(),
                location.line,
                location.column,
            ));
        }
    };

    Ok(build_style_source(selector, &declarations))
}

/// Parse `@keyframes name { stops }` (the at-keyword is already consumed).
fn parse_keyframes_rule<'i>(parser: &mut Parser<'i, '_>) -> Result<CssRuleSource> {
    let location = parser.current_source_location();

    let name = match parser.next() {
        Ok(Token::Ident(name)) => name.to_string(),
        Ok(Token::QuotedString(name)) => name.to_string(),
        _ => {
            return Err(Error::parse(
                "Expected keyframes name".to_string(),
                location.line,
                location.column,
            ));
        }
    };

    let keyframes = match parser.next() {
        Ok(Token::CurlyBracketBlock) => {
            parser
                .parse_nested_block(parse_keyframe_list)
                .map_err(|e: CssParseError<'_, ()>| {
                    Error::parse(
                        format!("Failed to parse keyframes block: {:?}", e),
                        location.line,
                        location.column,
                    )
                })?
        }
        _ => {
            return Err(Error::parse(
                "Expected '{' after keyframes name".to_string(),
                location.line,
                location.column,
            ));
        }
    };

    Ok(CssRuleSource::Keyframes(KeyframesSource { name, keyframes }))
}

/// Parse the stops inside a keyframes block.
fn parse_keyframe_list<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Vec<KeyframeSource>, CssParseError<'i, ()>> {
    let mut stops = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let key_start = parser.position();
        parser.parse_until_before(Delimiter::CurlyBracketBlock, |prelude| {
            while prelude.next_including_whitespace().is_ok() {}
            Ok::<_, CssParseError<'i, ()>>(())
        })?;
        let key_text = parser.slice_from(key_start).trim().to_string();

        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
                let declarations = parser.parse_nested_block(parse_declaration_list)?;
                stops.push(KeyframeSource {
                    key_text,
                    declarations,
                });
            }
            _ => break,
        }
    }

    Ok(stops)
}

/// Parse a declaration block into raw `(property, value)` pairs.
///
/// Values are captured as source slices, not token trees — the extractor and
/// the keyframe payload both want the author's exact text.
fn parse_declaration_list<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Vec<(String, String)>, CssParseError<'i, ()>> {
    let mut declarations = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let property = match parser.expect_ident() {
            Ok(name) => name.to_string(),
            Err(_) => {
                skip_declaration(parser);
                continue;
            }
        };

        if parser.expect_colon().is_err() {
            skip_declaration(parser);
            continue;
        }

        parser.skip_whitespace();
        let value_start = parser.position();
        while let Ok(token) = parser.next_including_whitespace() {
            if matches!(token, Token::Semicolon) {
                break;
            }
        }
        let value = parser
            .slice_from(value_start)
            .trim_end_matches(';')
            .trim()
            .to_string();

        declarations.push((property, value));
    }

    Ok(declarations)
}

/// Fold a declaration list into a style-rule record, expanding shorthands.
///
/// Declarations are applied in source order, so a longhand written after a
/// shorthand overrides it, exactly as the cascade would.
fn build_style_source(selector: String, declarations: &[(String, String)]) -> Option<CssRuleSource> {
    let mut source = StyleRuleSource::new(selector);

    for (property, value) in declarations {
        match property.to_ascii_lowercase().as_str() {
            "animation" => expand_animation(value, &mut source),
            "transition" => expand_transition(value, &mut source),
            "animation-name" => source.animation_name = value.clone(),
            "animation-duration" => source.animation_duration = value.clone(),
            "animation-delay" => source.animation_delay = value.clone(),
            "animation-direction" => source.animation_direction = value.clone(),
            "animation-fill-mode" => source.animation_fill_mode = value.clone(),
            "animation-timing-function" => source.animation_timing_function = value.clone(),
            "animation-iteration-count" => source.animation_iteration_count = value.clone(),
            "transition-property" => source.transition_property = value.clone(),
            "transition-duration" => source.transition_duration = value.clone(),
            "transition-delay" => source.transition_delay = value.clone(),
            "transition-timing-function" => source.transition_timing_function = value.clone(),
            _ => {}
        }
    }

    (source.has_animations() || source.has_transitions()).then_some(CssRuleSource::Style(source))
}

/// Skip to the next rule (error recovery).
fn skip_to_next_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
                // Skip block contents
                let _ = parser.parse_nested_block(|block| {
                    while !block.is_exhausted() {
                        let _ = block.next();
                    }
                    Ok::<_, CssParseError<'_, ()>>(())
                });
                return;
            }
            Ok(Token::Semicolon) => return,
            Ok(_) => {}
            Err(_) => return,
        }
    }
}

/// Skip to the end of the current declaration (error recovery).
fn skip_declaration(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::Semicolon) | Err(_) => return,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_rules(css: &str) -> Vec<StyleRuleSource> {
        parse_stylesheet(css)
            .unwrap()
            .into_iter()
            .filter_map(|rule| match rule {
                CssRuleSource::Style(style) => Some(style),
                CssRuleSource::Keyframes(_) => None,
            })
            .collect()
    }

    #[test]
    fn shorthand_rule_and_keyframes() {
        let css = ".a{animation:fade 1s 2s ease-in;}\
                   @keyframes fade{from{opacity:0}to{opacity:1}}";
        let rules = parse_stylesheet(css).unwrap();
        assert_eq!(rules.len(), 2);

        let CssRuleSource::Style(style) = &rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(style.selector, ".a");
        assert_eq!(style.animation_name, "fade");
        assert_eq!(style.animation_duration, "1s");
        assert_eq!(style.animation_delay, "2s");
        assert_eq!(style.animation_timing_function, "ease-in");

        let CssRuleSource::Keyframes(keyframes) = &rules[1] else {
            panic!("expected keyframes rule");
        };
        assert_eq!(keyframes.name, "fade");
        assert_eq!(keyframes.keyframes.len(), 2);
        assert_eq!(keyframes.keyframes[0].key_text, "from");
        assert_eq!(
            keyframes.keyframes[0].declarations,
            vec![("opacity".to_string(), "0".to_string())]
        );
    }

    #[test]
    fn longhand_declarations_pass_through() {
        let rules = style_rules(
            ".b {
                animation-name: slide, spin;
                animation-duration: 200ms, 400ms;
                animation-timing-function: steps(2, start), cubic-bezier(.1,.2,.3,.4);
            }",
        );
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].animation_name, "slide, spin");
        assert_eq!(rules[0].animation_duration, "200ms, 400ms");
        assert_eq!(
            rules[0].animation_timing_function,
            "steps(2, start), cubic-bezier(.1,.2,.3,.4)"
        );
    }

    #[test]
    fn longhand_after_shorthand_overrides() {
        let rules = style_rules(".c { animation: fade 1s; animation-duration: 3s; }");
        assert_eq!(rules[0].animation_duration, "3s");
        assert_eq!(rules[0].animation_name, "fade");
    }

    #[test]
    fn rules_without_animation_content_are_dropped() {
        let rules = parse_stylesheet(".plain { color: red; margin: 0; }").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn transition_shorthand() {
        let rules = style_rules(".d { transition: opacity 300ms ease-out 100ms, transform 1s; }");
        assert_eq!(rules[0].transition_property, "opacity, transform");
        assert_eq!(rules[0].transition_duration, "300ms, 1s");
        assert_eq!(rules[0].transition_delay, "100ms, 0s");
        assert_eq!(rules[0].transition_timing_function, "ease-out, ease");
    }

    #[test]
    fn broken_rule_does_not_take_out_the_rest() {
        let css = ".broken { animation: ; .nested-garbage { } }
                   .ok { animation: fade 1s; }";
        let rules = style_rules(css);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, ".ok");
    }

    #[test]
    fn comments_and_other_at_rules_are_skipped() {
        let css = "@import url('x.css');
                   /* comment */
                   @media (min-width: 100px) { .m { color: red; } }
                   .a { animation: fade 1s; /* inline */ }";
        let rules = style_rules(css);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, ".a");
    }

    #[test]
    fn percentage_stops_with_lists() {
        let css = "@keyframes blink { 0%, 50% { opacity: 0; } 100% { opacity: 1; } }";
        let rules = parse_stylesheet(css).unwrap();
        let CssRuleSource::Keyframes(keyframes) = &rules[0] else {
            panic!("expected keyframes rule");
        };
        assert_eq!(keyframes.keyframes[0].key_text, "0%, 50%");
        assert_eq!(keyframes.keyframes[1].key_text, "100%");
    }
}

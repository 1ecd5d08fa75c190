use crate::node::{CssRule, CssStylesheet, QualifiedRule, Rule, StyleRule, Stylesheet};
use crate::parser::selectors;
use crate::Css3;

impl Css3 {
    /// Parse a stylesheet and promote its qualified rules to style rules:
    /// each prelude is re-parsed as a selector list and each block as style
    /// block contents. At-rules pass through unchanged.
    pub fn parse_css_stylesheet(&mut self) -> CssStylesheet {
        log::trace!("parse_css_stylesheet");

        let stylesheet = self.parse_stylesheet();
        self.promote_stylesheet(stylesheet)
    }

    pub(crate) fn promote_stylesheet(&mut self, stylesheet: Stylesheet) -> CssStylesheet {
        let mut rules = Vec::new();

        for rule in stylesheet.rules {
            match rule {
                Rule::At(at_rule) => rules.push(CssRule::At(at_rule)),
                Rule::Qualified(rule) => {
                    if let Some(style_rule) = self.promote_qualified_rule(rule) {
                        rules.push(CssRule::Style(style_rule));
                    }
                }
            }
        }

        CssStylesheet {
            rules,
            location: stylesheet.location,
        }
    }

    /// Lifts one qualified rule into a style rule. A prelude that does not
    /// parse as a selector list drops the rule with a recoverable error; the
    /// new selector and declaration nodes do not alias the raw rule.
    fn promote_qualified_rule(&mut self, rule: QualifiedRule) -> Option<StyleRule> {
        log::trace!("promote_qualified_rule");

        let selectors = match selectors(&rule.prelude) {
            Ok(selectors) => selectors,
            Err(error) => {
                log::warn!("dropping rule with invalid selector list: {}", error);
                self.errors.push(error);
                return None;
            }
        };

        let (declarations, rules) = self.consume_style_block_contents(&rule.block.value);

        Some(StyleRule {
            selectors,
            declarations,
            rules,
            location: rule.location,
        })
    }
}

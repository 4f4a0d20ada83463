//! Report tokenizer and positional disambiguation.
//!
//! Splits raw report text into tokens and assigns each token exactly one
//! [`Group`]. Shape alone cannot tell a visibility in metres from half of a
//! validity range or a time group, so classification runs in two stages:
//!
//! 1. **Header**: report type, station identifier, observation/issue time,
//!    validity window and modifiers are recognised only at their fixed
//!    positions at the start of the report.
//! 2. **Body**: every remaining token is tried against the group classifiers
//!    in a fixed precedence order. Once a token is classified it is never
//!    reconsidered, and only the first visibility candidate of each period is
//!    taken as visibility.

use crate::constants::{REMARKS_MARKER, REPORT_MODIFIERS, REPORT_TYPES, SKY_CLEAR_MARKERS};
use crate::groups;
use crate::models::{
    ChangeIndicator, ClassifiedToken, Group, ReportModifier, ReportType, SkyClear, Token,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static WHOLE_MILES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}$").unwrap());

static FRACTION_MILES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}SM$").unwrap());

/// Split a raw report into whitespace-delimited tokens with byte offsets.
///
/// A whole number directly followed by a fractional statute-mile group
/// (`1 1/2SM`) is merged into one token spanning both words.
pub fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut words: Vec<Token<'_>> = Vec::new();
    let mut start: Option<usize> = None;

    for (index, ch) in raw.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                words.push(Token {
                    text: &raw[begin..index],
                    offset: begin,
                });
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        words.push(Token {
            text: &raw[begin..],
            offset: begin,
        });
    }

    let mut tokens = Vec::with_capacity(words.len());
    let mut index = 0;
    while index < words.len() {
        let word = words[index];
        match words.get(index + 1) {
            Some(next)
                if WHOLE_MILES_RE.is_match(word.text) && FRACTION_MILES_RE.is_match(next.text) =>
            {
                tokens.push(Token {
                    text: &raw[word.offset..next.end()],
                    offset: word.offset,
                });
                index += 2;
            }
            _ => {
                tokens.push(word);
                index += 1;
            }
        }
    }

    tokens
}

/// Tokenize and classify a raw report in one step
pub fn tokenize_and_classify(raw: &str) -> Vec<ClassifiedToken<'_>> {
    classify(&tokenize(raw))
}

/// Assign every token exactly one group, left to right
pub fn classify<'a>(tokens: &[Token<'a>]) -> Vec<ClassifiedToken<'a>> {
    let mut classified = Vec::with_capacity(tokens.len());
    let body_start = classify_header(tokens, &mut classified);

    let mut body = BodyClassifier::default();
    for token in &tokens[body_start..] {
        let group = body.classify(token.text);
        trace!("{:>12} -> {:?}", token.text, group.kind());
        classified.push(ClassifiedToken {
            token: *token,
            group,
        });
    }

    classified
}

/// Split classified tokens at the remarks marker.
///
/// Returns the tokens before `RMK` and the verbatim text following it, if any.
pub fn split_remarks<'t, 'a>(
    raw: &str,
    tokens: &'t [ClassifiedToken<'a>],
) -> (&'t [ClassifiedToken<'a>], Option<String>) {
    let Some(marker) = tokens
        .iter()
        .position(|t| matches!(t.group, Group::Remark))
    else {
        return (tokens, None);
    };

    let text = raw[tokens[marker].token.end()..].trim();
    let remarks = (!text.is_empty()).then(|| text.to_string());
    (&tokens[..marker], remarks)
}

/// Classify the fixed-position header groups and return the index of the
/// first body token.
fn classify_header<'a>(tokens: &[Token<'a>], out: &mut Vec<ClassifiedToken<'a>>) -> usize {
    let mut index = 0;
    let push = |out: &mut Vec<ClassifiedToken<'a>>, token: Token<'a>, group: Group| {
        trace!("{:>12} -> {:?} (header)", token.text, group.kind());
        out.push(ClassifiedToken { token, group });
    };

    // METAR / SPECI / TAF [AMD|COR]
    if let Some(report_type) = tokens
        .first()
        .filter(|t| REPORT_TYPES.contains(&t.text))
        .and_then(|t| ReportType::from_code(t.text))
    {
        push(out, tokens[0], Group::ReportType(report_type));
        index += 1;
        index += classify_modifiers(&tokens[index..], out, &["AMD", "COR"]);
    }

    let Some(station) = tokens
        .get(index)
        .and_then(|t| groups::parse_station_identifier(t.text))
    else {
        return index;
    };
    push(out, tokens[index], Group::StationIdentifier(station));
    index += 1;

    let Some(time) = tokens
        .get(index)
        .and_then(|t| groups::parse_station_time(t.text))
    else {
        return index;
    };
    push(out, tokens[index], Group::StationTime(time));
    index += 1;

    // Validity window directly after the issue time, modifiers either side
    index += classify_modifiers(&tokens[index..], out, REPORT_MODIFIERS);
    if let Some(window) = tokens
        .get(index)
        .and_then(|t| groups::parse_validity_window(t.text))
    {
        push(out, tokens[index], Group::ValidityWindow(window));
        index += 1;
        index += classify_modifiers(&tokens[index..], out, REPORT_MODIFIERS);
    }

    index
}

/// Classify a run of report modifiers from `allowed`, returning how many were consumed
fn classify_modifiers<'a>(
    tokens: &[Token<'a>],
    out: &mut Vec<ClassifiedToken<'a>>,
    allowed: &[&str],
) -> usize {
    let mut consumed = 0;
    for token in tokens {
        let modifier = allowed
            .contains(&token.text)
            .then(|| ReportModifier::from_code(token.text))
            .flatten();
        let Some(modifier) = modifier else {
            break;
        };
        out.push(ClassifiedToken {
            token: *token,
            group: Group::Modifier(modifier),
        });
        consumed += 1;
    }
    consumed
}

/// What a change keyword expects to see next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChangeHeader {
    #[default]
    None,
    /// After TEMPO/BECMG: a validity window or trend times
    AwaitingTime,
    /// After PROBnn: an optional TEMPO, then a validity window
    AwaitingProbTempo,
}

/// Per-report state for body classification
#[derive(Debug, Default)]
struct BodyClassifier {
    visibility_taken: bool,
    in_remarks: bool,
    change_header: ChangeHeader,
}

impl BodyClassifier {
    fn classify(&mut self, text: &str) -> Group {
        if self.in_remarks {
            return Group::Remark;
        }
        if text == REMARKS_MARKER {
            self.in_remarks = true;
            return Group::Remark;
        }

        if let Some(group) = self.classify_change_header(text) {
            return group;
        }

        if let Some(indicator) = groups::parse_change_indicator(text) {
            self.begin_period(indicator);
            return Group::ChangeIndicator(indicator);
        }

        self.classify_condition(text)
    }

    /// Time groups belonging to the change keyword just seen
    fn classify_change_header(&mut self, text: &str) -> Option<Group> {
        let state = std::mem::take(&mut self.change_header);
        match state {
            ChangeHeader::None => None,
            ChangeHeader::AwaitingProbTempo if text == "TEMPO" => {
                self.change_header = ChangeHeader::AwaitingTime;
                Some(Group::ChangeIndicator(ChangeIndicator::Tempo))
            }
            ChangeHeader::AwaitingProbTempo | ChangeHeader::AwaitingTime => {
                if let Some(window) = groups::parse_validity_window(text) {
                    return Some(Group::ValidityWindow(window));
                }
                if let Some(time) = groups::parse_trend_time(text) {
                    self.change_header = ChangeHeader::AwaitingTime;
                    return Some(Group::TrendTime(time));
                }
                None
            }
        }
    }

    fn begin_period(&mut self, indicator: ChangeIndicator) {
        self.visibility_taken = false;
        self.change_header = match indicator {
            ChangeIndicator::Tempo | ChangeIndicator::Becmg => ChangeHeader::AwaitingTime,
            ChangeIndicator::Prob(_) => ChangeHeader::AwaitingProbTempo,
            ChangeIndicator::From(_) | ChangeIndicator::Nosig => ChangeHeader::None,
        };
    }

    /// Weather groups in precedence order
    fn classify_condition(&mut self, text: &str) -> Group {
        if text == "CAVOK" {
            self.visibility_taken = true;
            return Group::Cavok;
        }
        if let Some(wind) = groups::parse_wind(text) {
            return Group::Wind(wind);
        }
        if let Some(variation) = groups::parse_wind_variation(text) {
            return Group::WindVariation(variation);
        }
        if let Some(rvr) = groups::parse_runway_visual_range(text) {
            return Group::RunwayVisualRange(rvr);
        }
        if !self.visibility_taken {
            let visibility = groups::parse_visibility_metres(text)
                .or_else(|| groups::parse_visibility_miles(text));
            if let Some(visibility) = visibility {
                self.visibility_taken = true;
                return Group::Visibility(visibility);
            }
        }
        if let Some(layer) = groups::parse_cloud_layer(text) {
            return Group::CloudLayer(layer);
        }
        if SKY_CLEAR_MARKERS.contains(&text) {
            if let Some(marker) = SkyClear::from_code(text) {
                return Group::SkyClear(marker);
            }
        }
        if text == "NSW" {
            return Group::NoSignificantWeather;
        }
        if let Some(phenomenon) = groups::parse_weather_phenomenon(text) {
            return Group::WeatherPhenomenon(phenomenon);
        }
        if let Some(temperature) = groups::parse_temperature_dewpoint(text) {
            return Group::TemperatureDewpoint(temperature);
        }
        if let Some(extreme) = groups::parse_temperature_extreme(text) {
            return Group::TemperatureExtreme(extreme);
        }
        if let Some(pressure) = groups::parse_pressure(text) {
            return Group::Pressure(pressure);
        }

        trace!("Unrecognized group: {}", text);
        Group::Unrecognized
    }
}

//! TAF timeline segmentation.
//!
//! A forecast is split into an ordered list of periods by a single forward
//! cursor over the classified tokens. Each change keyword closes the open
//! period and opens the next one, so every token belongs to at most one
//! period and periods come out in textual order with non-overlapping
//! condition text. The same segmenter handles the trend section of a METAR.

use crate::conditions::ConditionsBuilder;
use crate::models::{
    ChangeIndicator, ClassifiedToken, Group, PeriodKind, PeriodValidity, ReportModifier,
    TafForecast, TafHeader, TafPeriod, TrendTime,
};
use crate::tokenizer::{split_remarks, tokenize_and_classify};
use tracing::debug;

/// Decode a raw TAF into its header and period timeline.
///
/// Never fails: groups that cannot be decoded are simply absent from the
/// result.
pub fn decode_taf(raw: &str) -> TafForecast {
    let classified = tokenize_and_classify(raw);
    let (header, body_start) = read_header(&classified);
    let (body, remarks) = split_remarks(raw, &classified[body_start..]);

    let base = header.validity.map(PeriodValidity::Window);
    let timeline = segment(raw, body, base);

    debug!(
        "Decoded TAF {}: {} periods",
        header.station.as_deref().unwrap_or("????"),
        timeline.periods.len()
    );

    TafForecast {
        raw_text: raw.to_string(),
        header,
        periods: timeline.periods,
        remarks,
    }
}

/// Read the leading header groups, returning the header and the index of
/// the first body token
fn read_header(tokens: &[ClassifiedToken<'_>]) -> (TafHeader, usize) {
    let mut header = TafHeader::default();
    let mut consumed = 0;

    for token in tokens {
        match &token.group {
            Group::ReportType(_) => {}
            Group::StationIdentifier(station) => header.station = Some(station.clone()),
            Group::StationTime(time) => header.issue_time = Some(*time),
            Group::ValidityWindow(window) if header.validity.is_none() => {
                header.validity = Some(*window)
            }
            Group::Modifier(modifier) => match modifier {
                ReportModifier::Amended => header.amended = true,
                ReportModifier::Corrected => header.corrected = true,
                ReportModifier::Nil => header.nil = true,
                ReportModifier::Auto => {}
            },
            _ => break,
        }
        consumed += 1;
    }

    (header, consumed)
}

/// Periods produced by one pass of the segmenter
#[derive(Debug, Default)]
pub(crate) struct Timeline {
    pub periods: Vec<TafPeriod>,
    /// A `NOSIG` keyword was seen
    pub no_significant_change: bool,
}

/// Segment `tokens` into periods.
///
/// When `base` is given a Base period with that validity is open from the
/// first token; otherwise tokens before the first change keyword open an
/// unspecified Base period only if there are any.
pub(crate) fn segment(
    raw: &str,
    tokens: &[ClassifiedToken<'_>],
    base: Option<PeriodValidity>,
) -> Timeline {
    let segmenter = Segmenter {
        raw,
        periods: Vec::new(),
        open: base.map(|validity| OpenPeriod::new(PeriodKind::Base, validity)),
        no_significant_change: false,
    };
    segmenter.run(tokens)
}

/// A period whose condition text is still being read
#[derive(Debug)]
struct OpenPeriod {
    kind: PeriodKind,
    validity: PeriodValidity,
    trend_times: Vec<TrendTime>,
    conditions: ConditionsBuilder,
    /// Byte span of the condition text within the raw report
    span: Option<(usize, usize)>,
}

impl OpenPeriod {
    fn new(kind: PeriodKind, validity: PeriodValidity) -> Self {
        Self {
            kind,
            validity,
            trend_times: Vec::new(),
            conditions: ConditionsBuilder::new(),
            span: None,
        }
    }

    fn add(&mut self, token: &ClassifiedToken<'_>) {
        self.conditions.push(&token.group);
        let start = self.span.map_or(token.token.offset, |(start, _)| start);
        self.span = Some((start, token.token.end()));
    }

    fn close(self, raw: &str) -> TafPeriod {
        let condition_text = self
            .span
            .map(|(start, end)| raw[start..end].to_string())
            .unwrap_or_default();

        TafPeriod {
            kind: self.kind,
            validity: self.validity,
            trend_times: self.trend_times,
            condition_text,
            conditions: self.conditions.finish(),
        }
    }
}

struct Segmenter<'r> {
    raw: &'r str,
    periods: Vec<TafPeriod>,
    open: Option<OpenPeriod>,
    no_significant_change: bool,
}

impl Segmenter<'_> {
    fn run(mut self, tokens: &[ClassifiedToken<'_>]) -> Timeline {
        let mut cursor = 0;

        while let Some(token) = tokens.get(cursor) {
            cursor += 1;
            match &token.group {
                Group::ChangeIndicator(indicator) => {
                    self.close_period();
                    cursor = self.open_period(*indicator, tokens, cursor);
                }
                _ => self
                    .open
                    .get_or_insert_with(|| {
                        OpenPeriod::new(PeriodKind::Base, PeriodValidity::Unspecified)
                    })
                    .add(token),
            }
        }
        self.close_period();

        Timeline {
            periods: self.periods,
            no_significant_change: self.no_significant_change,
        }
    }

    fn close_period(&mut self) {
        if let Some(open) = self.open.take() {
            let period = open.close(self.raw);
            debug!(
                "Period {:?} {:?}: {:?}",
                period.kind, period.validity, period.condition_text
            );
            self.periods.push(period);
        }
    }

    /// Open the period introduced by `indicator` and consume its time
    /// groups, returning the advanced cursor
    fn open_period(
        &mut self,
        indicator: ChangeIndicator,
        tokens: &[ClassifiedToken<'_>],
        mut cursor: usize,
    ) -> usize {
        let (kind, validity) = match indicator {
            ChangeIndicator::Tempo => (PeriodKind::Tempo, PeriodValidity::Unspecified),
            ChangeIndicator::Becmg => (PeriodKind::Becmg, PeriodValidity::Unspecified),
            ChangeIndicator::From(at) => (PeriodKind::From, PeriodValidity::From(at)),
            ChangeIndicator::Prob(probability) => {
                let tempo = matches!(
                    tokens.get(cursor).map(|t| &t.group),
                    Some(Group::ChangeIndicator(ChangeIndicator::Tempo))
                );
                if tempo {
                    cursor += 1;
                }
                (
                    PeriodKind::Prob { probability, tempo },
                    PeriodValidity::Unspecified,
                )
            }
            ChangeIndicator::Nosig => {
                self.no_significant_change = true;
                return cursor;
            }
        };

        let mut period = OpenPeriod::new(kind, validity);
        while let Some(token) = tokens.get(cursor) {
            match &token.group {
                Group::ValidityWindow(window) if period.validity == PeriodValidity::Unspecified => {
                    period.validity = PeriodValidity::Window(*window);
                }
                Group::TrendTime(time) => period.trend_times.push(*time),
                _ => break,
            }
            cursor += 1;
        }

        self.open = Some(period);
        cursor
    }
}

//! Condition assembly shared by the METAR decoder and the TAF segmenter.
//!
//! Singular groups (wind, wind variation, visibility, sky-clear marker) keep
//! their first occurrence; repeatable groups (clouds, phenomena, temperature
//! extremes) keep source order.

use crate::models::{Group, PeriodConditions, Visibility};

#[derive(Debug, Default)]
pub struct ConditionsBuilder {
    conditions: PeriodConditions,
}

impl ConditionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one group into the conditions.
    ///
    /// Returns `false` when the group is not a period condition and was left
    /// for the caller.
    pub fn push(&mut self, group: &Group) -> bool {
        let conditions = &mut self.conditions;
        match group {
            Group::Wind(wind) => {
                conditions.wind.get_or_insert(*wind);
            }
            Group::WindVariation(variation) => {
                conditions.wind_variation.get_or_insert(*variation);
            }
            Group::Visibility(visibility) => {
                conditions.visibility.get_or_insert(*visibility);
            }
            Group::Cavok => {
                conditions.cavok = true;
                conditions.visibility.get_or_insert(Visibility::Cavok);
            }
            Group::CloudLayer(layer) => conditions.clouds.push(*layer),
            Group::SkyClear(marker) => {
                conditions.sky_clear.get_or_insert(*marker);
            }
            Group::WeatherPhenomenon(phenomenon) => conditions.phenomena.push(phenomenon.clone()),
            Group::NoSignificantWeather => conditions.no_significant_weather = true,
            Group::TemperatureExtreme(extreme) => conditions.temperature_extremes.push(*extreme),
            _ => return false,
        }
        true
    }

    pub fn finish(self) -> PeriodConditions {
        self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups;

    fn assemble_conditions<'g>(list: impl IntoIterator<Item = &'g Group>) -> PeriodConditions {
        let mut builder = ConditionsBuilder::new();
        for group in list {
            builder.push(group);
        }
        builder.finish()
    }

    fn group_list(codes: &[&str]) -> Vec<Group> {
        codes
            .iter()
            .map(|code| {
                groups::parse_wind(code)
                    .map(Group::Wind)
                    .or_else(|| groups::parse_visibility_metres(code).map(Group::Visibility))
                    .or_else(|| groups::parse_cloud_layer(code).map(Group::CloudLayer))
                    .or_else(|| groups::parse_weather_phenomenon(code).map(Group::WeatherPhenomenon))
                    .unwrap_or(Group::Unrecognized)
            })
            .collect()
    }

    #[test]
    fn test_first_singular_group_wins() {
        let conditions = assemble_conditions(&group_list(&["26010KT", "9999", "18005KT", "4000"]));
        assert_eq!(conditions.wind.unwrap().speed, 10);
        assert_eq!(
            conditions.visibility,
            Some(Visibility::Metres {
                metres: 9999,
                no_directional_variation: false
            })
        );
    }

    #[test]
    fn test_repeatable_groups_keep_source_order() {
        let conditions =
            assemble_conditions(&group_list(&["OVC040", "-RA", "BKN008", "BR", "FEW002"]));
        let heights: Vec<_> = conditions.clouds.iter().map(|l| l.height_ft).collect();
        assert_eq!(heights, vec![4000, 800, 200]);
        let codes: Vec<_> = conditions.phenomena.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec!["-RA", "BR"]);
        assert_eq!(conditions.ceiling_ft(), Some(800));
    }

    #[test]
    fn test_cavok_implies_unrestricted_visibility() {
        let conditions = assemble_conditions(&[Group::Cavok]);
        assert!(conditions.cavok);
        assert_eq!(conditions.visibility, Some(Visibility::Cavok));
    }

    #[test]
    fn test_non_condition_groups_are_left_for_caller() {
        let mut builder = ConditionsBuilder::new();
        assert!(!builder.push(&Group::Remark));
        assert!(!builder.push(&Group::Unrecognized));
        assert!(builder.finish().is_empty());
    }
}

//! Card filter parameters and their validation.
//!
//! [`FilterParams`] is the raw, stringly-typed filter as it arrives from a
//! caller. Converting it into a [`CardFilter`] validates every field, so a
//! `CardFilter` can always be turned into a query.

use std::str::FromStr;

use serde::Deserialize;

use crate::{
  Error, Result,
  card::Color,
  predicate::{ColorMatch, Field, Predicate},
};

/// How requested colors are compared with a card's color identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorLogic {
  /// Identity contains every requested color.
  All,
  /// Identity equals the requested colors, ignoring order.
  Exact,
  /// Identity shares a color with the request. Requesting `C` also matches
  /// cards with an empty identity.
  #[default]
  Any,
}

impl FromStr for ColorLogic {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "all" => Ok(Self::All),
      "exact" => Ok(Self::Exact),
      "any" => Ok(Self::Any),
      other => Err(Error::InvalidColorLogic(other.to_owned())),
    }
  }
}

/// Unvalidated filter input. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
  pub name:        Option<String>,
  pub oracle:      Option<String>,
  pub cmc:         Option<String>,
  /// Comma-separated color symbols, e.g. `R,W`.
  pub colors:      Option<String>,
  #[serde(rename = "colorLogic")]
  pub color_logic: Option<String>,
}

/// A validated card filter. All present fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
  /// Case-insensitive substring of the card name.
  pub name:        Option<String>,
  /// Case-insensitive substring of the card's or either face's oracle text.
  pub oracle:      Option<String>,
  pub cmc:         Option<u32>,
  pub colors:      Vec<Color>,
  pub color_logic: ColorLogic,
}

fn present(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

fn parse_cmc(raw: &str) -> Result<u32> {
  if !raw.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::InvalidCmc(raw.to_owned()));
  }
  raw.parse().map_err(|_| Error::InvalidCmc(raw.to_owned()))
}

fn parse_colors(raw: &str) -> Result<Vec<Color>> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::parse::<Color>)
    .collect()
}

impl TryFrom<FilterParams> for CardFilter {
  type Error = Error;

  fn try_from(params: FilterParams) -> Result<Self> {
    let cmc = present(params.cmc).as_deref().map(parse_cmc).transpose()?;
    let color_logic = present(params.color_logic)
      .as_deref()
      .map(str::parse::<ColorLogic>)
      .transpose()?
      .unwrap_or_default();
    let colors = present(params.colors)
      .as_deref()
      .map(parse_colors)
      .transpose()?
      .unwrap_or_default();

    Ok(Self {
      name: present(params.name),
      oracle: present(params.oracle),
      cmc,
      colors,
      color_logic,
    })
  }
}

impl CardFilter {
  /// The filter-specific clauses, without the catalog-wide base predicate.
  pub fn predicate(&self) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(name) = &self.name {
      clauses.push(Predicate::Contains(Field::Name, name.clone()));
    }

    if let Some(oracle) = &self.oracle {
      clauses.push(Predicate::Or(vec![
        Predicate::Contains(Field::OracleText, oracle.clone()),
        Predicate::Contains(Field::FaceOracleText, oracle.clone()),
        Predicate::Contains(Field::SecondFaceOracleText, oracle.clone()),
      ]));
    }

    if let Some(cmc) = self.cmc {
      clauses.push(Predicate::NumberEquals(Field::Cmc, cmc));
    }

    if !self.colors.is_empty() {
      clauses.push(self.color_predicate());
    }

    Predicate::And(clauses)
  }

  fn color_predicate(&self) -> Predicate {
    let colors = self.colors.clone();
    match self.color_logic {
      ColorLogic::All => Predicate::Colors(ColorMatch::ContainsAll(colors)),
      ColorLogic::Exact => Predicate::Colors(ColorMatch::EqualsSorted(colors)),
      ColorLogic::Any if colors.contains(&Color::C) => Predicate::Or(vec![
        Predicate::Colors(ColorMatch::Intersects(colors)),
        Predicate::Colors(ColorMatch::Empty),
      ]),
      ColorLogic::Any => Predicate::Colors(ColorMatch::Intersects(colors)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(pairs: &[(&str, &str)]) -> FilterParams {
    let mut p = FilterParams::default();
    for (k, v) in pairs {
      let v = Some((*v).to_owned());
      match *k {
        "name" => p.name = v,
        "oracle" => p.oracle = v,
        "cmc" => p.cmc = v,
        "colors" => p.colors = v,
        "colorLogic" => p.color_logic = v,
        other => panic!("unknown param {other}"),
      }
    }
    p
  }

  #[test]
  fn empty_params_are_an_empty_filter() {
    let filter = CardFilter::try_from(FilterParams::default()).unwrap();
    assert_eq!(filter, CardFilter::default());
    assert_eq!(filter.predicate(), Predicate::And(vec![]));
  }

  #[test]
  fn empty_strings_are_absent() {
    let filter =
      CardFilter::try_from(params(&[("name", ""), ("cmc", ""), ("colorLogic", "")]))
        .unwrap();
    assert_eq!(filter, CardFilter::default());
  }

  #[test]
  fn cmc_must_be_digits() {
    for bad in ["abc", "-1", "1.5", " 3", "3a", "+2"] {
      let err = CardFilter::try_from(params(&[("cmc", bad)])).unwrap_err();
      assert_eq!(err, Error::InvalidCmc(bad.into()), "{bad}");
    }
    let ok = CardFilter::try_from(params(&[("cmc", "03")])).unwrap();
    assert_eq!(ok.cmc, Some(3));
  }

  #[test]
  fn oversized_cmc_is_rejected() {
    let err =
      CardFilter::try_from(params(&[("cmc", "99999999999999999999")])).unwrap_err();
    assert!(matches!(err, Error::InvalidCmc(_)));
  }

  #[test]
  fn color_logic_must_be_known() {
    let err = CardFilter::try_from(params(&[("colorLogic", "most")])).unwrap_err();
    assert_eq!(err, Error::InvalidColorLogic("most".into()));
    assert_eq!(err.to_string(), "Invalid color logic value: \"most\"");

    for (raw, logic) in [
      ("all", ColorLogic::All),
      ("exact", ColorLogic::Exact),
      ("any", ColorLogic::Any),
    ] {
      let f = CardFilter::try_from(params(&[("colorLogic", raw)])).unwrap();
      assert_eq!(f.color_logic, logic);
    }
  }

  #[test]
  fn colors_are_split_and_trimmed() {
    let f = CardFilter::try_from(params(&[("colors", "R, w,,C")])).unwrap();
    assert_eq!(f.colors, vec![Color::R, Color::W, Color::C]);

    let err = CardFilter::try_from(params(&[("colors", "R,Q")])).unwrap_err();
    assert_eq!(err, Error::InvalidColor("Q".into()));
  }

  #[test]
  fn colorless_any_is_scoped_inside_color_clause() {
    let f = CardFilter {
      name: Some("bolt".into()),
      colors: vec![Color::C, Color::R],
      ..CardFilter::default()
    };
    assert_eq!(
      f.predicate(),
      Predicate::And(vec![
        Predicate::Contains(Field::Name, "bolt".into()),
        Predicate::Or(vec![
          Predicate::Colors(ColorMatch::Intersects(vec![Color::C, Color::R])),
          Predicate::Colors(ColorMatch::Empty),
        ]),
      ])
    );
  }

  #[test]
  fn color_logic_without_colors_adds_nothing() {
    let f = CardFilter::try_from(params(&[("colorLogic", "exact")])).unwrap();
    assert_eq!(f.predicate(), Predicate::And(vec![]));
  }
}

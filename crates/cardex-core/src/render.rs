//! Rendering of predicates and selects to SQLite text.
//!
//! User-supplied values only ever reach the output as bound parameters; the
//! text contains numbered placeholders (`?1`, `?2`, ...) in parameter order.

use std::fmt::{self, Write as _};

use crate::{
  card::sorted_symbols,
  predicate::{ColorMatch, Predicate},
};

/// Name of the Unicode-aware lowercasing SQL function the store registers.
/// SQLite's own `LOWER` and `LIKE` only fold ASCII.
pub const LOWER_FN: &str = "unicode_lower";

/// Fold case the way [`LOWER_FN`] does.
pub fn fold_case(value: &str) -> String { value.to_lowercase() }

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
  Text(String),
  Integer(i64),
}

/// Query text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Param>,
}

/// How a select orders its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
  NameAscending,
  Random,
}

/// A single-table select over `cards`.
#[derive(Debug, Clone)]
pub struct Select {
  pub columns: &'static str,
  pub filter:  Predicate,
  pub order:   Order,
  pub limit:   u32,
}

impl Select {
  pub fn to_statement(&self) -> Statement {
    let mut sql = String::new();
    let mut params = Vec::new();
    let mut fmt = Formatter { dst: &mut sql, params: &mut params };

    // Writing to a `String` cannot fail.
    let _ = fmt.select(self);

    Statement { sql, params }
  }
}

/// Escape `LIKE` wildcards so `value` matches literally under `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

/// Escape `GLOB` metacharacters so `value` matches literally.
pub fn escape_glob(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '*' | '?' | '[' => {
        out.push('[');
        out.push(ch);
        out.push(']');
      }
      _ => out.push(ch),
    }
  }
  out
}

struct Formatter<'a> {
  /// Where to write the SQL string
  dst:    &'a mut String,
  /// Values referenced by placeholders, in placeholder order.
  params: &'a mut Vec<Param>,
}

impl Formatter<'_> {
  fn bind(&mut self, param: Param) -> fmt::Result {
    self.params.push(param);
    write!(self.dst, "?{}", self.params.len())
  }

  fn select(&mut self, select: &Select) -> fmt::Result {
    write!(self.dst, "SELECT {} FROM cards WHERE ", select.columns)?;
    self.predicate(&select.filter)?;
    match select.order {
      Order::NameAscending => write!(self.dst, " ORDER BY name ASC")?,
      Order::Random => write!(self.dst, " ORDER BY RANDOM()")?,
    }
    write!(self.dst, " LIMIT ")?;
    self.bind(Param::Integer(i64::from(select.limit)))
  }

  fn list(&mut self, items: &[Predicate], op: &str, empty: &str) -> fmt::Result {
    if items.is_empty() {
      return write!(self.dst, "{empty}");
    }
    write!(self.dst, "(")?;
    for (i, item) in items.iter().enumerate() {
      if i > 0 {
        write!(self.dst, " {op} ")?;
      }
      self.predicate(item)?;
    }
    write!(self.dst, ")")
  }

  fn predicate(&mut self, p: &Predicate) -> fmt::Result {
    match p {
      Predicate::And(items) => self.list(items, "AND", "1"),
      Predicate::Or(items) => self.list(items, "OR", "0"),
      Predicate::Not(inner) => {
        write!(self.dst, "NOT (")?;
        self.predicate(inner)?;
        write!(self.dst, ")")
      }
      Predicate::IsNotNull(field) => write!(self.dst, "{} IS NOT NULL", field.sql()),
      Predicate::NotEmpty(field) => write!(self.dst, "{} <> ''", field.sql()),
      Predicate::Equals(field, value) => {
        write!(self.dst, "{} = ", field.sql())?;
        self.bind(Param::Text(value.clone()))
      }
      Predicate::In(field, values) => {
        if values.is_empty() {
          return write!(self.dst, "0");
        }
        write!(self.dst, "{} IN (", field.sql())?;
        for (i, value) in values.iter().enumerate() {
          if i > 0 {
            write!(self.dst, ", ")?;
          }
          self.bind(Param::Text(value.clone()))?;
        }
        write!(self.dst, ")")
      }
      Predicate::Contains(field, needle) => {
        write!(self.dst, "{LOWER_FN}({}) LIKE {LOWER_FN}(", field.sql())?;
        self.bind(Param::Text(format!("%{}%", escape_like(needle))))?;
        write!(self.dst, ") ESCAPE '\\'")
      }
      Predicate::StartsWith(field, prefix) => {
        write!(self.dst, "{} GLOB ", field.sql())?;
        self.bind(Param::Text(format!("{}*", escape_glob(prefix))))
      }
      Predicate::StartsWithIgnoreCase(field, prefix) => {
        write!(self.dst, "{LOWER_FN}({}) LIKE {LOWER_FN}(", field.sql())?;
        self.bind(Param::Text(format!("{}%", escape_like(prefix))))?;
        write!(self.dst, ") ESCAPE '\\'")
      }
      Predicate::NumberEquals(field, n) => {
        write!(self.dst, "CAST({} AS NUMERIC) = ", field.sql())?;
        self.bind(Param::Integer(i64::from(*n)))
      }
      Predicate::Colors(m) => self.colors(m),
    }
  }

  fn colors(&mut self, m: &ColorMatch) -> fmt::Result {
    const IDENTITY: &str = "json_each(cards.color_identity)";

    match m {
      ColorMatch::ContainsAll(colors) => {
        let clauses: Vec<_> = colors
          .iter()
          .map(|c| Predicate::Colors(ColorMatch::Intersects(vec![*c])))
          .collect();
        self.list(&clauses, "AND", "1")
      }
      ColorMatch::EqualsSorted(colors) => {
        write!(
          self.dst,
          "COALESCE((SELECT group_concat(value, ',' ORDER BY value) FROM {IDENTITY}), '') = "
        )?;
        self.bind(Param::Text(sorted_symbols(colors).join(",")))
      }
      ColorMatch::Intersects(colors) => {
        if colors.is_empty() {
          return write!(self.dst, "0");
        }
        write!(self.dst, "EXISTS (SELECT 1 FROM {IDENTITY} WHERE value IN (")?;
        for (i, c) in colors.iter().enumerate() {
          if i > 0 {
            write!(self.dst, ", ")?;
          }
          self.bind(Param::Text(c.symbol().to_owned()))?;
        }
        write!(self.dst, "))")
      }
      ColorMatch::Empty => {
        write!(self.dst, "json_array_length(cards.color_identity) = 0")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{card::Color, predicate::Field};

  fn predicate(p: &Predicate) -> Statement {
    let mut sql = String::new();
    let mut params = Vec::new();
    let mut fmt = Formatter { dst: &mut sql, params: &mut params };
    fmt.predicate(p).unwrap();
    Statement { sql, params }
  }

  #[test]
  fn placeholders_follow_param_order() {
    let p = Predicate::And(vec![
      Predicate::Contains(Field::Name, "bolt".into()),
      Predicate::NumberEquals(Field::Cmc, 1),
      Predicate::In(Field::SetType, vec!["core".into(), "expansion".into()]),
    ]);
    let stmt = predicate(&p);
    assert_eq!(
      stmt.sql,
      "(unicode_lower(name) LIKE unicode_lower(?1) ESCAPE '\\' AND CAST(cmc AS NUMERIC) = ?2 \
       AND set_type IN (?3, ?4))"
    );
    assert_eq!(
      stmt.params,
      vec![
        Param::Text("%bolt%".into()),
        Param::Integer(1),
        Param::Text("core".into()),
        Param::Text("expansion".into()),
      ]
    );
  }

  #[test]
  fn user_input_never_reaches_sql_text() {
    let evil = "'; DROP TABLE cards; --";
    let stmt = predicate(&Predicate::Contains(Field::Name, evil.into()));
    assert!(!stmt.sql.contains("DROP"));
    assert_eq!(stmt.params, vec![Param::Text(format!("%{evil}%"))]);
  }

  #[test]
  fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_glob("A-*?["), "A-[*][?][[]");
  }

  #[test]
  fn colorless_or_is_parenthesized() {
    let p = Predicate::And(vec![
      Predicate::NotEmpty(Field::ManaCost),
      Predicate::Or(vec![
        Predicate::Colors(ColorMatch::Intersects(vec![Color::C])),
        Predicate::Colors(ColorMatch::Empty),
      ]),
    ]);
    let stmt = predicate(&p);
    assert_eq!(
      stmt.sql,
      "(mana_cost <> '' AND (EXISTS (SELECT 1 FROM json_each(cards.color_identity) \
       WHERE value IN (?1)) OR json_array_length(cards.color_identity) = 0))"
    );
  }

  #[test]
  fn exact_binds_sorted_key() {
    let stmt = predicate(&Predicate::Colors(ColorMatch::EqualsSorted(vec![
      Color::W,
      Color::R,
    ])));
    assert!(stmt.sql.contains("group_concat(value, ',' ORDER BY value)"));
    assert_eq!(stmt.params, vec![Param::Text("R,W".into())]);
  }

  #[test]
  fn select_binds_limit_last() {
    let stmt = Select {
      columns: "name",
      filter:  Predicate::And(vec![]),
      order:   Order::NameAscending,
      limit:   7,
    }
    .to_statement();
    assert_eq!(stmt.sql, "SELECT name FROM cards WHERE 1 ORDER BY name ASC LIMIT ?1");
    assert_eq!(stmt.params, vec![Param::Integer(7)]);
  }
}

use sea_orm::{Order, QueryOrder, Select};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};
use std::fmt;

use crate::errors::ApiError;
use crate::traits::{Resource, find_column};

/// Sort direction of one `order` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

/// The `order` member of a request body: `{"age":"desc","id":"asc"}`.
///
/// Entries keep the order in which they appear in the document, so the first
/// key is the primary sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orders(pub Vec<(String, Direction)>);

impl Orders {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply the orders to `query`, falling back to the id column ascending.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for a key outside
    /// [`Resource::sortable_columns`].
    pub fn apply<R: Resource>(
        &self,
        query: Select<R::Entity>,
    ) -> Result<Select<R::Entity>, ApiError> {
        if self.0.is_empty() {
            return Ok(query.order_by(R::default_index_column(), Order::Asc));
        }

        let columns = R::sortable_columns();
        self.0.iter().try_fold(query, |query, (field, direction)| {
            let column = find_column(field, &columns)
                .ok_or_else(|| ApiError::bad_request(format!("cannot sort by `{field}`")))?;
            Ok(query.order_by(column, Order::from(*direction)))
        })
    }
}

impl<'de> Deserialize<'de> for Orders {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrdersVisitor;

        impl<'de> Visitor<'de> for OrdersVisitor {
            type Value = Orders;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a map of field to "asc" or "desc""#)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((field, direction)) = map.next_entry::<String, String>()? {
                    let direction = Direction::parse(&direction).ok_or_else(|| {
                        de::Error::custom(format!(
                            "order of `{field}` must be \"asc\" or \"desc\", got \"{direction}\""
                        ))
                    })?;
                    entries.push((field, direction));
                }
                Ok(Orders(entries))
            }
        }

        deserializer.deserialize_map(OrdersVisitor)
    }
}

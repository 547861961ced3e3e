use crate::{Artifact, ClientError, GridItem, PlaceholderId};

/// Placeholders (newest first) ahead of the fetched artifacts.
pub fn compose_grid(pending: &[PlaceholderId], artifacts: &[Artifact]) -> Vec<GridItem> {
    pending
        .iter()
        .map(|id| GridItem::Placeholder { id: *id })
        .chain(
            artifacts
                .iter()
                .cloned()
                .map(|data| GridItem::Artifact { data }),
        )
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    Loading,
    Failed(String),
    Empty,
    Items(Vec<GridItem>),
}

impl GridView {
    /// `fetched` is `None` while the active query is still loading.
    pub fn build(pending: &[PlaceholderId], fetched: Option<Result<&[Artifact], &ClientError>>) -> Self {
        let artifacts = match fetched {
            Some(Err(error)) => return GridView::Failed(error.to_string()),
            Some(Ok(artifacts)) => artifacts,
            None if pending.is_empty() => return GridView::Loading,
            None => &[],
        };

        let items = compose_grid(pending, artifacts);
        if items.is_empty() {
            GridView::Empty
        } else {
            GridView::Items(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compose_grid, GridView};
    use crate::testing::artifact;
    use crate::{ClientError, GridItem, PlaceholderId};

    #[test]
    fn placeholders_lead_the_grid() {
        let pending = [PlaceholderId::new(), PlaceholderId::new()];
        let artifacts = [artifact("a1")];

        let items = compose_grid(&pending, &artifacts);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], GridItem::Placeholder { id: pending[0] });
        assert!(items[1].is_placeholder());
        assert!(!items[2].is_placeholder());
    }

    #[test]
    fn view_states() {
        let pending = [PlaceholderId::new()];
        let error = ClientError::Ingest("boom".to_string());

        assert_eq!(GridView::build(&[], None), GridView::Loading);
        assert_eq!(GridView::build(&[], Some(Ok(&[][..]))), GridView::Empty);
        assert_eq!(
            GridView::build(&pending, Some(Err(&error))),
            GridView::Failed("boom".to_string())
        );
        assert!(matches!(
            GridView::build(&pending, None),
            GridView::Items(items) if items.len() == 1
        ));
    }
}

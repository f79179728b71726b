use crate::{Interaction, RequestVariant, ResourceType};
use hyper::Method;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UriMatch<'a> {
    Exact(&'a str),
    Contains(&'a str),
}

impl<'a> UriMatch<'a> {
    fn matches(&self, uri: &str) -> bool {
        match self {
            UriMatch::Exact(expected) => uri == *expected,
            UriMatch::Contains(segment) => uri.contains(segment),
        }
    }
}

impl<'a> From<&'a str> for UriMatch<'a> {
    fn from(uri: &'a str) -> Self {
        UriMatch::Exact(uri)
    }
}

impl<'a> From<&'a String> for UriMatch<'a> {
    fn from(uri: &'a String) -> Self {
        UriMatch::Exact(uri.as_str())
    }
}

#[derive(Debug, Default)]
struct UriIndex {
    // uris in the order they were first recorded
    order: Vec<String>,
    positions: HashMap<String, Vec<usize>>,
}

impl UriIndex {
    fn insert(&mut self, uri: &str, position: usize) {
        match self.positions.get_mut(uri) {
            Some(positions) => positions.push(position),
            None => {
                self.order.push(uri.to_owned());
                self.positions.insert(uri.to_owned(), vec![position]);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct InteractionLedger {
    interactions: Vec<Interaction>,
    index: HashMap<(Method, RequestVariant), UriIndex>,
}

impl InteractionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, interaction: Interaction) -> &Interaction {
        let position = self.interactions.len();

        debug!(
            "Recording interaction {}: {} {} ({:?}) -> {}",
            position,
            interaction.method(),
            interaction.uri(),
            interaction.variant(),
            interaction.status_code()
        );

        self.index
            .entry((interaction.method().clone(), interaction.variant()))
            .or_default()
            .insert(interaction.uri(), position);
        self.interactions.push(interaction);

        &self.interactions[position]
    }

    pub fn find<'a, U: Into<UriMatch<'a>>>(
        &self,
        method: &Method,
        uri: U,
        variant: RequestVariant,
    ) -> Option<&Interaction> {
        self.find_where(method, uri, variant, |_| true)
    }

    pub fn find_normal<'a, U: Into<UriMatch<'a>>>(
        &self,
        method: &Method,
        uri: U,
    ) -> Option<&Interaction> {
        self.find(method, uri, RequestVariant::Normal)
    }

    /// Most recent interaction for the key that also satisfies `predicate`.
    pub fn find_where<'a, U, P>(
        &self,
        method: &Method,
        uri: U,
        variant: RequestVariant,
        predicate: P,
    ) -> Option<&Interaction>
    where
        U: Into<UriMatch<'a>>,
        P: Fn(&Interaction) -> bool,
    {
        let uri_index = self.index.get(&(method.clone(), variant))?;

        let mut positions: Vec<usize> = match uri.into() {
            UriMatch::Exact(uri) => uri_index.positions.get(uri)?.clone(),
            uri_match => uri_index
                .positions
                .iter()
                .filter(|(uri, _)| uri_match.matches(uri))
                .flat_map(|(_, positions)| positions.iter().copied())
                .collect(),
        };
        positions.sort_unstable();

        positions
            .into_iter()
            .rev()
            .map(|position| &self.interactions[position])
            .find(|interaction| predicate(*interaction))
    }

    /// Every capture for the key, oldest first.
    pub fn history(
        &self,
        method: &Method,
        uri: &str,
        variant: RequestVariant,
    ) -> Vec<&Interaction> {
        self.index
            .get(&(method.clone(), variant))
            .and_then(|uri_index| uri_index.positions.get(uri))
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.interactions[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn find_all_by_method(&self, method: &Method) -> Vec<(&str, &Interaction)> {
        self.find_all_by_method_and_variant(method, RequestVariant::Normal)
    }

    /// One entry per distinct uri holding its most recent interaction.
    pub fn find_all_by_method_and_variant(
        &self,
        method: &Method,
        variant: RequestVariant,
    ) -> Vec<(&str, &Interaction)> {
        let uri_index = match self.index.get(&(method.clone(), variant)) {
            Some(uri_index) => uri_index,
            None => return Vec::new(),
        };

        uri_index
            .order
            .iter()
            .filter_map(|uri| {
                uri_index
                    .positions
                    .get(uri)
                    .and_then(|positions| positions.last())
                    .map(|&position| (uri.as_str(), &self.interactions[position]))
            })
            .collect()
    }

    pub fn find_all_by_variant(&self, variant: RequestVariant) -> Vec<&Interaction> {
        self.interactions
            .iter()
            .filter(|interaction| interaction.variant() == variant)
            .collect()
    }

    pub fn find_all_by_resource_type(&self, resource_type: ResourceType) -> Vec<&Interaction> {
        self.interactions
            .iter()
            .filter(|interaction| interaction.resource_type() == Some(resource_type))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions.iter()
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}

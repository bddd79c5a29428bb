use scraper::Selector;

use crate::extractor::model::ExtractError;
use crate::providers::SelectorContract;

/// A [`SelectorContract`] parsed once per provider run.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub card: Selector,
    pub title: Selector,
    pub link: Option<Selector>,
    pub company: Option<Selector>,
    pub location: Option<Selector>,
    pub description: Selector,
}

impl CompiledSelectors {
    pub fn compile(contract: &SelectorContract) -> Result<Self, ExtractError> {
        Ok(Self {
            card: parse("card", &contract.card)?,
            title: parse("title", &contract.title)?,
            link: parse_optional("link", contract.link.as_deref())?,
            company: parse_optional("company", contract.company.as_deref())?,
            location: parse_optional("location", contract.location.as_deref())?,
            description: parse("description", &contract.description)?,
        })
    }
}

fn parse(field: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn parse_optional(
    field: &'static str,
    selector: Option<&str>,
) -> Result<Option<Selector>, ExtractError> {
    selector.map(|s| parse(field, s)).transpose()
}

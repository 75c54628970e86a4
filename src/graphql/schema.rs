use async_graphql::{EmptySubscription, Schema};

use super::mutations::MutationRoot;
use super::queries::QueryRoot;

/// GraphQL Schema type
pub type FeedSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema. Repositories and the revalidator are attached
/// per request as context data.
pub fn build_schema() -> FeedSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

//! GraphQL Schema
//!
//! Exposes `createPaymentIntent`:
//!
//! ```graphql
//! mutation {
//!   createPaymentIntent(input: { orderKey: "wc_order_abc" }) {
//!     status
//!     data
//!   }
//! }
//! ```

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema, SimpleObject,
};
use axum::{Router, routing::get};

use payment_intents::{IntentError, OrderReference, PaymentIntentResolver};

use crate::handlers::{graphql_handler, graphql_playground};
use crate::state::AppState;

/// GraphQL schema type
pub type IntentSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Create the GraphQL schema
pub fn build_schema(resolver: PaymentIntentResolver) -> IntentSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(resolver)
        .finish()
}

/// Register the GraphQL endpoint and playground
pub fn register(router: Router<AppState>) -> Router<AppState> {
    router.route("/graphql", get(graphql_playground).post(graphql_handler))
}

/// Map a resolver failure onto a user-facing GraphQL error
fn to_graphql_error(err: &IntentError) -> async_graphql::Error {
    let code = err.code();
    async_graphql::Error::new(err.user_message()).extend_with(|_, ext| ext.set("code", code))
}

#[derive(InputObject)]
pub struct CreatePaymentIntentInput {
    /// The order key to create a payment intent for
    pub order_key: Option<String>,

    /// The order id to create a payment intent for; takes precedence over `orderKey`
    pub order_id: Option<String>,

    /// Opaque value echoed back in the payload
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreatePaymentIntentPayload {
    /// True if the payment intent was created successfully
    pub status: bool,

    /// The payment intent data returned by Stripe, as a JSON string
    pub data: String,

    pub client_mutation_id: Option<String>,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Payment intent id stored on an order, if one was created
    async fn payment_intent_id(
        &self,
        ctx: &Context<'_>,
        order_id: String,
    ) -> async_graphql::Result<Option<String>> {
        let resolver = ctx.data::<PaymentIntentResolver>()?;
        let order = resolver.orders().find_by_id(&order_id).map_err(|e| {
            tracing::error!(order_id = %order_id, error = %e, "Order lookup failed");
            to_graphql_error(&e)
        })?;

        Ok(order.and_then(|o| o.payment_intent_id().map(str::to_owned)))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a Stripe payment intent for an order
    async fn create_payment_intent(
        &self,
        ctx: &Context<'_>,
        input: CreatePaymentIntentInput,
    ) -> async_graphql::Result<CreatePaymentIntentPayload> {
        let resolver = ctx.data::<PaymentIntentResolver>()?;
        let reference =
            OrderReference::from_input(input.order_id.as_deref(), input.order_key.as_deref());

        let result = resolver
            .create_payment_intent(reference)
            .await
            .map_err(|e| {
                tracing::warn!(code = e.code(), error = %e, "createPaymentIntent failed");
                to_graphql_error(&e)
            })?;

        Ok(CreatePaymentIntentPayload {
            status: result.status,
            data: result.data,
            client_mutation_id: input.client_mutation_id,
        })
    }
}

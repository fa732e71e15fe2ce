use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use supabase_lite_core::{HttpMethod, HttpRequest, SupabaseError, SupabaseResult, Transport};

use crate::execute;
use crate::postgrest::build_rpc_request;
use crate::state::{validate_identifier, CountOption};

/// Builder for RPC (function call) queries.
///
/// Defaults to POST with the arguments as a JSON body. Every non-2xx answer,
/// including an unknown function, is returned as an error.
pub struct RpcBuilder {
    transport: Transport,
    schema: String,
    function: String,
    args: JsonValue,
    method: HttpMethod,
    count: CountOption,
}

impl RpcBuilder {
    pub fn new(
        transport: Transport,
        schema: String,
        function: String,
        args: JsonValue,
    ) -> Result<Self, SupabaseError> {
        validate_identifier(&function, "Function")?;

        if let JsonValue::Object(ref map) = args {
            for key in map.keys() {
                validate_identifier(key, "Parameter")?;
            }
        } else if !args.is_null() {
            return Err(SupabaseError::invalid_input(
                "RPC arguments must be a JSON object or null",
            ));
        }

        Ok(Self {
            transport,
            schema,
            function: function.trim().to_string(),
            args,
            method: HttpMethod::Post,
            count: CountOption::None,
        })
    }

    /// Call with GET or HEAD instead of POST (read-only functions).
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Request a row count for set-returning functions.
    pub fn count(mut self, count: CountOption) -> Self {
        self.count = count;
        self
    }

    /// Call the function in another schema.
    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    /// Render the request without sending it.
    pub fn to_request(&self) -> SupabaseResult<HttpRequest> {
        validate_identifier(&self.schema, "Schema")?;
        build_rpc_request(
            &self.schema,
            &self.function,
            &self.args,
            self.method,
            self.count,
        )
    }

    /// Execute the call and return the decoded body.
    pub async fn execute(self) -> SupabaseResult<JsonValue> {
        let request = self.to_request()?;
        execute::execute_rpc(&self.transport, &self.function, request).await
    }

    /// Execute the call and decode the body into `T`.
    pub async fn execute_as<T: DeserializeOwned>(self) -> SupabaseResult<T> {
        let value = self.execute().await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use supabase_lite_core::{RequestBody, SupabaseConfig};

    fn rpc(function: &str, args: JsonValue) -> SupabaseResult<RpcBuilder> {
        let transport =
            Transport::new(&SupabaseConfig::new("https://example.supabase.co", "key")).unwrap();
        RpcBuilder::new(transport, "public".into(), function.into(), args)
    }

    #[test]
    fn defaults_to_post() {
        let req = rpc("hello_world", JsonValue::Null).unwrap().to_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path(), "/rest/v1/rpc/hello_world");
        assert_eq!(req.body, Some(RequestBody::Json(json!({}))));
    }

    #[test]
    fn method_and_count() {
        let req = rpc("echo", json!({"name": "world"}))
            .unwrap()
            .method(HttpMethod::Get)
            .count(CountOption::Exact)
            .to_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query_value("name"), Some("world"));
        assert_eq!(req.header_value("prefer"), Some("count=exact"));
    }

    #[test]
    fn rejects_empty_function() {
        let err = rpc("", JsonValue::Null).err().unwrap();
        assert!(matches!(err, SupabaseError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_object_args() {
        let err = rpc("f", json!([1, 2])).err().unwrap();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn rejects_bad_parameter_names() {
        assert!(rpc("f", json!({"a;b": 1})).is_err());
    }

    #[test]
    fn put_is_rejected_at_render() {
        let err = rpc("f", JsonValue::Null)
            .unwrap()
            .method(HttpMethod::Put)
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("PUT"));
    }
}

//! Blocking HTTP adapter. One request per call, credentials passed per
//! request, no connection state kept between calls.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info};

use qgate_core::config::{RepoCredentials, ServerConfig};
use qgate_core::errors::ClientError;
use qgate_core::traits::{BranchSource, GateServer};
use qgate_core::types::{GateEvaluation, Lookup, ProjectMetadata, RepoBranch, TrackedProject};

use crate::decode;

/// The quality-gate service over its legacy web API.
pub struct HttpGateServer {
    config: ServerConfig,
    client: Client,
}

impl HttpGateServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Build a GET request; `query` values are percent-encoded, so keys
    /// and gate names may carry any character.
    fn get_request(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Request, ClientError> {
        self.client
            .get(self.url(path))
            .query(query)
            .basic_auth(&self.config.login, Some(&self.config.password))
            .build()
            .map_err(|source| transport(&self.url(path), source))
    }

    /// GET a path, reporting HTTP 404 as `Missing` and any other non-2xx
    /// as a status error carrying the full body.
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Lookup<String>, ClientError> {
        let request = self.get_request(path, query)?;
        let url = request.url().to_string();
        debug!(%url, "GET");
        let response = self
            .client
            .execute(request)
            .map_err(|source| transport(&url, source))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(%url, "resource not found");
            return Ok(Lookup::Missing);
        }
        let body = response.text().map_err(|source| transport(&url, source))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(Lookup::Found(body))
    }

    /// POST a form. Unlike lookups, a 404 here is a hard failure.
    fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<String, ClientError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.login, Some(&self.config.password))
            .form(form)
            .send()
            .map_err(|source| transport(&url, source))?;
        let status = response.status();
        let body = response.text().map_err(|source| transport(&url, source))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl GateServer for HttpGateServer {
    fn resource(&self, project_key: &str) -> Result<Lookup<ProjectMetadata>, ClientError> {
        let query = [("format", "json"), ("resource", project_key)];
        match self.get("/api/resources", &query)? {
            Lookup::Found(body) => decode::decode_resource(project_key, &body),
            Lookup::Missing => Ok(Lookup::Missing),
        }
    }

    fn create_project(&self, project_key: &str) -> Result<ProjectMetadata, ClientError> {
        info!(key = %project_key, "create project");
        let body = self.post_form(
            "/api/projects/create",
            &[("key", project_key), ("name", project_key)],
        )?;
        info!(response = %body, "project created");
        Ok(ProjectMetadata {
            id: qgate_core::json::id_field(&body)?,
            key: project_key.to_string(),
            last_analysis: None,
            raw: body,
        })
    }

    fn gate_definition(&self, gate_name: &str) -> Result<Lookup<String>, ClientError> {
        match self.get("/api/qualitygates/show", &[("name", gate_name)])? {
            // A 200 without an id still means the gate is unknown.
            Lookup::Found(body) => Ok(match qgate_core::json::id_field(&body)? {
                Some(id) if !id.trim().is_empty() => Lookup::Found(id),
                _ => Lookup::Missing,
            }),
            Lookup::Missing => Ok(Lookup::Missing),
        }
    }

    fn bind_gate(&self, project_id: i64, gate_id: &str) -> Result<(), ClientError> {
        let project_id = project_id.to_string();
        self.post_form(
            "/api/qualitygates/select",
            &[("gateId", gate_id), ("projectId", project_id.as_str())],
        )?;
        Ok(())
    }

    fn gate_evaluation(&self, project_key: &str) -> Result<Lookup<GateEvaluation>, ClientError> {
        let query = [
            ("metrics", "quality_gate_details"),
            ("format", "json"),
            ("resource", project_key),
        ];
        info!(key = %project_key, "retrieve quality gate details");
        match self.get("/api/resources/index", &query)? {
            Lookup::Found(body) => {
                debug!(state = %body, "resulting quality gate state");
                Ok(Lookup::Found(decode::decode_evaluation(&body)?))
            }
            Lookup::Missing => Ok(Lookup::Missing),
        }
    }

    fn tracked_projects(&self) -> Result<Vec<TrackedProject>, ClientError> {
        let path = "/api/projects";
        match self.get(path, &[("format", "json")])? {
            Lookup::Found(body) => decode::decode_tracked(&body),
            // A missing listing endpoint is a broken server, not "no data".
            Lookup::Missing => Err(ClientError::Status {
                url: self.url(path),
                status: 404,
                body: String::new(),
            }),
        }
    }

    fn delete_project(&self, project_id: &str) -> Result<String, ClientError> {
        let url = self.url(&format!("/api/projects/{project_id}"));
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.login, Some(&self.config.password))
            .send()
            .map_err(|source| transport(&url, source))?;
        let status = response.status();
        let body = response.text().map_err(|source| transport(&url, source))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// The repository host's branch-listing API, HTTP Basic authenticated.
pub struct HttpBranchSource {
    credentials: RepoCredentials,
    client: Client,
}

impl HttpBranchSource {
    pub fn new(credentials: RepoCredentials) -> Self {
        Self {
            credentials,
            client: Client::new(),
        }
    }
}

impl BranchSource for HttpBranchSource {
    fn branches(&self, listing_url: &str) -> Result<Vec<RepoBranch>, ClientError> {
        info!(url = %listing_url, "fetch repository branches");
        let response = self
            .client
            .get(listing_url)
            .header("Accept", "application/json")
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .send()
            .map_err(|source| transport(listing_url, source))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|source| transport(listing_url, source))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                url: listing_url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        decode::decode_branches(&body)
    }
}

fn transport(url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> HttpGateServer {
        HttpGateServer::new(ServerConfig {
            url: "http://gate.local/".to_string(),
            login: "user".to_string(),
            password: "pass".to_string(),
        })
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let request = server()
            .get_request("/api/qualitygates/show", &[("name", "gate&edge #1")])
            .unwrap();

        assert_eq!(request.url().path(), "/api/qualitygates/show");
        assert_eq!(request.url().query(), Some("name=gate%26edge+%231"));
    }

    #[test]
    fn trailing_slash_on_the_base_url_does_not_double_up() {
        let request = server()
            .get_request("/api/resources", &[("format", "json"), ("resource", "g:a")])
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://gate.local/api/resources?format=json&resource=g%3Aa"
        );
    }
}

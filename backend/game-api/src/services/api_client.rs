use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::GameError;
use crate::models::api::{
    GameplayCreated, KymAnswers, KymGameplaySummary, KymQuestion, KymRevealedQuestion, LoginData,
    LoginOtpRequest, ScoreSubmission, User,
};
use crate::services::game_controller::ScoreReporter;
use crate::services::token_store::TokenStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const LINK_FAILED: &str =
    "Something went wrong when trying to link your account. Please try again.";
const START_FAILED: &str = "Something went wrong when trying to start the game. Please try again.";
const QUESTION_FAILED: &str =
    "Something went wrong when trying to get a question. Please try again.";
const ANSWER_FAILED: &str =
    "Something went wrong when trying to submit your answer. Please try again.";
const SCORE_FAILED: &str = "Something went wrong when trying to submit your score. Please try again.";

/// Client for the Artcade REST API. Every call carries the stored token.
pub struct ArtcadeApi {
    http_client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ArtcadeApi {
    pub fn new(http_client: Client, base_url: impl Into<String>, tokens: TokenStore) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub async fn get_user_info(&self) -> Result<User, GameError> {
        let response = self
            .send(self.http_client.get(self.url("/auth/user-info")))
            .await
            .map_err(|e| {
                tracing::warn!("User info request failed: {}", e);
                GameError::AuthFailed("Something went wrong".to_string())
            })?;

        match response.status() {
            status if status.is_success() => parse(response)
                .await
                .map_err(|_| GameError::AuthFailed("Something went wrong".to_string())),
            StatusCode::UNAUTHORIZED => Err(GameError::AuthFailed("Unauthorized".to_string())),
            status => {
                tracing::warn!("User info returned status {}", status);
                Err(GameError::AuthFailed("Something went wrong".to_string()))
            }
        }
    }

    /// Links the account with a one-time code and persists the returned token.
    pub async fn login_otp(&self, code: &str) -> Result<LoginData, GameError> {
        let body = LoginOtpRequest {
            code: code.to_string(),
        };
        let login: LoginData = self
            .post_expecting(
                "/auth/login/otp",
                Some(&body),
                GameError::AuthFailed(LINK_FAILED.to_string()),
            )
            .await?;

        self.tokens.save(&login.token).await?;
        tracing::info!("Account linked for {}", login.user.username);
        Ok(login)
    }

    pub async fn logout(&self) -> Result<(), GameError> {
        self.tokens.clear().await?;
        tracing::info!("Stored auth token cleared");
        Ok(())
    }

    pub async fn start_gameplay(&self) -> Result<u64, GameError> {
        let created: GameplayCreated = self
            .post_expecting::<(), _>(
                "/kym/gameplay",
                None,
                GameError::SubmissionFailed(START_FAILED.to_string()),
            )
            .await?;
        Ok(created.id)
    }

    pub async fn create_question(&self, gameplay_id: u64) -> Result<KymQuestion, GameError> {
        self.post_expecting::<(), _>(
            &format!("/kym/gameplay/{}/question", gameplay_id),
            None,
            GameError::SubmissionFailed(QUESTION_FAILED.to_string()),
        )
        .await
    }

    pub async fn submit_question(
        &self,
        question_id: u64,
        answers: &KymAnswers,
    ) -> Result<KymRevealedQuestion, GameError> {
        self.post_expecting(
            &format!("/kym/question/{}/submit", question_id),
            Some(answers),
            GameError::SubmissionFailed(ANSWER_FAILED.to_string()),
        )
        .await
    }

    pub async fn submit_gameplay(&self, gameplay_id: u64) -> Result<KymGameplaySummary, GameError> {
        self.post_expecting::<(), _>(
            &format!("/kym/gameplay/{}/submit", gameplay_id),
            None,
            GameError::SubmissionFailed(ANSWER_FAILED.to_string()),
        )
        .await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GameError> {
        let mut request = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(REQUEST_TIMEOUT);
        if let Some(token) = self.tokens.load().await? {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }

        request
            .send()
            .await
            .map_err(|e| GameError::SubmissionFailed(format!("request failed: {}", e)))
    }

    /// POSTs `body` and decodes a 2xx reply; anything else becomes `failure`.
    async fn post_expecting<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        failure: GameError,
    ) -> Result<T, GameError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Calling Artcade API: POST {}", endpoint);

        let mut request = self.http_client.post(self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("POST {} failed: {}", endpoint, e);
                return Err(failure);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("POST {} returned {}: {}", endpoint, status, error_text);
            return Err(failure);
        }

        parse(response).await.map_err(|e| {
            tracing::warn!("POST {} returned an unreadable body: {}", endpoint, e);
            failure
        })
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, reqwest::Error> {
    response.json::<T>().await
}

#[async_trait]
impl ScoreReporter for ArtcadeApi {
    /// Single attempt; the caller surfaces the failure.
    async fn submit_score(&self, total_score: u64) -> Result<(), GameError> {
        let body = ScoreSubmission { score: total_score };
        let request = self.http_client.post(self.url("/scores/demo")).json(&body);

        let response = self.send(request).await.map_err(|e| {
            tracing::warn!("Score submission failed: {}", e);
            GameError::SubmissionFailed(SCORE_FAILED.to_string())
        })?;

        if !response.status().is_success() {
            tracing::warn!("Score submission returned {}", response.status());
            return Err(GameError::SubmissionFailed(SCORE_FAILED.to_string()));
        }
        Ok(())
    }
}

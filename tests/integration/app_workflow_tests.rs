/*!
 * Integration tests for file, folder, URL and fragment workflows
 */

use anyhow::Result;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vttlate::app_controller::{Controller, FileResult};
use vttlate::file_utils::FileManager;
use vttlate::interceptor::HttpDocumentSource;
use vttlate::providers::mock::MockProvider;

use crate::common::{self, SAMPLE_VTT};

fn controller(mock: &MockProvider) -> Controller {
    let config = common::mock_config();
    let service = common::service_with(mock);
    let source = HttpDocumentSource::new(5).unwrap();
    Controller::with_parts(config, service, Arc::new(source))
}

#[tokio::test]
async fn test_translate_file_shouldWriteLanguageSuffixedOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.vtt")?;
    let mock = MockProvider::working().with_custom_response(common::dictionary);

    let result = controller(&mock).translate_file(&input, temp_dir.path(), false).await?;

    let output = temp_dir.path().join("episode.en.vtt");
    assert_eq!(result, FileResult::Written(output.clone()));
    let content = FileManager::read_to_string(&output)?;
    assert_eq!(content, SAMPLE_VTT.replace("Hello", "Hola").replace("Goodbye", "Adiós"));
    Ok(())
}

#[tokio::test]
async fn test_translate_file_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.vtt")?;
    common::create_test_file(temp_dir.path(), "episode.en.vtt", "old")?;
    let mock = MockProvider::working();
    let controller = controller(&mock);

    let skipped = controller.translate_file(&input, temp_dir.path(), false).await?;
    assert!(matches!(skipped, FileResult::Skipped(_)));
    assert_eq!(mock.request_count(), 0);

    let written = controller.translate_file(&input, temp_dir.path(), true).await?;
    assert!(matches!(written, FileResult::Written(_)));
    assert_ne!(FileManager::read_to_string(temp_dir.path().join("episode.en.vtt"))?, "old");
    Ok(())
}

#[tokio::test]
async fn test_run_folder_shouldTranslateSourcesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.vtt")?;
    common::create_test_subtitle(temp_dir.path(), "b.vtt")?;
    common::create_test_file(temp_dir.path(), "c.en.vtt", SAMPLE_VTT)?;
    let mock = MockProvider::working();

    controller(&mock).run_folder(temp_dir.path(), false).await?;

    assert!(temp_dir.path().join("a.en.vtt").exists());
    assert!(temp_dir.path().join("b.en.vtt").exists());
    assert!(!temp_dir.path().join("c.en.en.vtt").exists());
    assert_eq!(mock.request_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let mock = MockProvider::working();
    assert!(controller(&mock).run("/no/such/file.vtt", None, false).await.is_err());
}

#[tokio::test]
async fn test_translate_url_shouldNameOutputAfterLastSegment() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subs/episode-3.vtt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_VTT))
        .mount(&server)
        .await;
    let temp_dir = common::create_temp_dir()?;
    let mock = MockProvider::working();

    let url = format!("{}/subs/episode-3.vtt", server.uri());
    controller(&mock).run(&url, Some(temp_dir.path().to_path_buf()), false).await?;

    let content = FileManager::read_to_string(temp_dir.path().join("episode-3.en.vtt"))?;
    assert!(content.contains("[en] Hello"));
    Ok(())
}

#[tokio::test]
async fn test_run_fragments_shouldMergeCleanAndTranslate() -> Result<()> {
    let server = MockServer::start().await;
    let fragments = [
        "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nERR Heli tekstiks\n\n00:00:01.000 --> 00:00:02.000\nTere hommikust\n",
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nTere hommikust\n\n00:00:03.000 --> 00:00:04.000\nKuidas läheb?\n",
    ];
    for (index, body) in fragments.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/hls/fragment-{}-f4.vtt", index)))
            .respond_with(ResponseTemplate::new(200).set_body_string(*body))
            .mount(&server)
            .await;
    }
    // Unmatched requests get a 404 from wiremock, which ends the stream

    let temp_dir = common::create_temp_dir()?;
    let mock = MockProvider::working().with_custom_response(common::dictionary);
    let template = format!("{}/hls/fragment-{{}}-f4.vtt", server.uri());

    let result = controller(&mock)
        .run_fragments(&template, temp_dir.path(), "episode", false)
        .await?;

    let cleaned = FileManager::read_to_string(temp_dir.path().join("episode.vtt"))?;
    assert_eq!(
        cleaned,
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nTere hommikust\n\n00:00:03.000 --> 00:00:04.000\nKuidas läheb?\n"
    );

    let output = temp_dir.path().join("episode.en.vtt");
    assert_eq!(result, FileResult::Written(output.clone()));
    let translated = FileManager::read_to_string(&output)?;
    assert!(translated.contains("\nGood morning\n"));
    assert!(translated.contains("\nHow are you?\n"));
    Ok(())
}

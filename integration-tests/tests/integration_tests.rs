
use anyhow::Result;
use common::{error::AppError, storage::types::language::Language};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::tempdir;
use test_utils::{config_for, IndexServer, XREF_BODY};
use xref_pipeline::{QueryOutcome, QueryRequest, XrefPipeline};

const INDEX_FILE: &str = "vtk_vtk-examples_xref.json";

#[tokio::test]
async fn first_query_downloads_and_caches_the_index() -> Result<()> {
    let server = IndexServer::default();
    let addr = server.start().await;
    let cache_dir = tempdir()?;
    let pipeline = XrefPipeline::new(&config_for(addr, INDEX_FILE, &cache_dir))?;

    let request = QueryRequest::new("vtkActor", "PYTHON").with_max_count(2);
    let outcome = pipeline.run(&request, &mut StdRng::seed_from_u64(1)).await?;

    assert_eq!(server.hits(), 1);
    let cached = cache_dir.path().join(INDEX_FILE);
    assert_eq!(std::fs::read_to_string(cached)?, XREF_BODY);

    let QueryOutcome::Found(report) = outcome else {
        panic!("expected examples for vtkActor/Python");
    };
    assert_eq!(report.total, 4);
    assert_eq!(report.examples.len(), 2);
    assert!(report.sampled);
    Ok(())
}

#[tokio::test]
async fn second_query_reuses_the_cache() -> Result<()> {
    let server = IndexServer::default();
    let addr = server.start().await;
    let cache_dir = tempdir()?;
    let pipeline = XrefPipeline::new(&config_for(addr, INDEX_FILE, &cache_dir))?;
    let mut rng = StdRng::seed_from_u64(2);

    pipeline
        .run(&QueryRequest::new("vtkActor", "Cxx"), &mut rng)
        .await?;
    let outcome = pipeline
        .run(&QueryRequest::new("vtkNamedColors", "java"), &mut rng)
        .await?;

    assert_eq!(server.hits(), 1);
    assert_eq!(outcome.examples(), ["NamedColors"]);
    assert_eq!(
        outcome.to_string(),
        "VTK Class: vtkNamedColors, language: Java\nNumber of example(s): 1.\nNamedColors"
    );
    Ok(())
}

#[tokio::test]
async fn unknown_class_reads_as_no_examples() -> Result<()> {
    let server = IndexServer::default();
    let addr = server.start().await;
    let cache_dir = tempdir()?;
    let pipeline = XrefPipeline::new(&config_for(addr, INDEX_FILE, &cache_dir))?;

    let outcome = pipeline
        .run(
            &QueryRequest::new("vtkNoSuchClass", "python"),
            &mut StdRng::seed_from_u64(3),
        )
        .await?;

    assert_eq!(
        outcome,
        QueryOutcome::NoExamples {
            class_name: "vtkNoSuchClass".into(),
            language: Language::Python,
        }
    );
    assert_eq!(
        outcome.to_string(),
        "No examples for the VTK Class: vtkNoSuchClass and language: Python"
    );
    Ok(())
}

#[tokio::test]
async fn unsupported_language_never_contacts_the_server() -> Result<()> {
    let server = IndexServer::default();
    let addr = server.start().await;
    let cache_dir = tempdir()?;
    let pipeline = XrefPipeline::new(&config_for(addr, INDEX_FILE, &cache_dir))?;

    let outcome = pipeline
        .run(
            &QueryRequest::new("vtkActor", "Fortran"),
            &mut StdRng::seed_from_u64(4),
        )
        .await?;

    assert!(matches!(outcome, QueryOutcome::UnsupportedLanguage { .. }));
    assert_eq!(server.hits(), 0);
    assert!(!pipeline.cache_store().exists().await);
    Ok(())
}

#[tokio::test]
async fn server_error_is_a_transport_failure() -> Result<()> {
    let server = IndexServer::default();
    let addr = server.start().await;
    let cache_dir = tempdir()?;
    let pipeline = XrefPipeline::new(&config_for(addr, "broken.json", &cache_dir))?;

    let err = pipeline
        .run(
            &QueryRequest::new("vtkActor", "Python"),
            &mut StdRng::seed_from_u64(5),
        )
        .await
        .expect_err("500 must fail the query");

    assert!(matches!(err, AppError::Transport { .. }));
    assert_eq!(err.status(), Some(500));
    assert_eq!(server.hits(), 1);
    assert!(!cache_dir.path().join("broken.json").exists());
    Ok(())
}

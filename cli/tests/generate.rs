//! # Screengen Generate Integration Tests
//!
//! File: cli/tests/generate.rs
//!
//! ## Overview
//!
//! End-to-end runs of `screengen generate` against the sample templates, one
//! temporary project per test.
//!

mod common;
use common::*;
use predicates::prelude::*;
use serde_json::{json, Value};

const MOCK_CSV: &str = "name,route,route_mock_sample,isGet,hasReqBody,response_sample,request_sample,description,created\n\
Foo,/foo,foo,y,n,\"{\"\"id\"\":1}\",,Get a foo,n\n\
SaveFoo,/foo,foo,n,y,\"{\"\"ok\"\":true}\",\"{\"\"id\"\":1}\",Save a foo,n\n";

#[test]
fn test_mock_generation_end_to_end() {
    let project = Project::new().with_sample_config();
    project.write("MOCK_ENDPOINTS.csv", MOCK_CSV);

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mock: 2 created, 0 already created, 0 conflict(s) skipped, 0 failed"));

    assert_eq!(
        project.read("out/mirage/fixtures/FooFixture.json").trim_end(),
        r#"{ "data": {"id":1} }"#
    );
    assert_eq!(
        project.read("out/mirage/request_placeholders/SaveFooSampleRequest.json").trim_end(),
        r#"{"id":1}"#
    );
    assert!(!project.path("out/mirage/request_placeholders/FooSampleRequest.json").exists());

    let routes = project.read("out/mirage/routes/index.js");
    assert!(routes.contains("this.get('/foo', () => fixtures.FooFixture);"));
    assert!(routes.contains("this.post('/foo'"));
    let fixtures = project.read("out/mirage/fixtures/index.js");
    assert!(fixtures.contains("import FooFixture from '@mirage/fixtures/FooFixture.json';"));
    assert!(project.read("out/mirage/request_placeholders/index.js").contains("SaveFooSampleRequest,"));
    assert!(project.read("out/mirage/models/index.js").contains("SaveFoo: Model,"));
    assert!(project.read("out/app/screens/TestScreen.js").contains("setSaveFoo"));

    let csv = project.read("MOCK_ENDPOINTS.csv");
    assert!(csv.lines().skip(1).all(|line| line.ends_with(",y")), "{}", csv);
}

#[test]
fn test_json_samples_are_written_as_typed() {
    let project = Project::new().with_sample_config();
    project.write(
        "MOCK_ENDPOINTS.csv",
        "name,route,hasReqBody,response_sample,request_sample\n\
         Price,/price,y,\"{\"\"zeta\"\":1,\"\"alpha\"\":2,\"\"price\"\":1.10}\",\"{\"\"amount\"\":12345678901234567890123}\"\n",
    );

    project.cmd(&["generate", "mock"]).assert().success();

    assert_eq!(
        project.read("out/mirage/fixtures/PriceFixture.json").trim_end(),
        r#"{ "data": {"zeta":1,"alpha":2,"price":1.10} }"#
    );
    assert_eq!(
        project.read("out/mirage/request_placeholders/PriceSampleRequest.json").trim_end(),
        r#"{"amount":12345678901234567890123}"#
    );
}

#[test]
fn test_unreadable_row_leaves_mock_indexes_alone() {
    let project = Project::new().with_sample_config();
    project.write("MOCK_ENDPOINTS.csv", MOCK_CSV);
    project.cmd(&["generate", "mock"]).assert().success();
    let routes_before = project.read("out/mirage/routes/index.js");

    let csv = project.read("MOCK_ENDPOINTS.csv").replace("\"{\"\"ok\"\":true}\"", "{broken");
    project.write("MOCK_ENDPOINTS.csv", &csv);

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Aggregate files not updated")
                .and(predicate::str::contains("1 row(s) could not be read")),
        );
    assert_eq!(project.read("out/mirage/routes/index.js"), routes_before);
    assert!(routes_before.contains("this.post('/foo'"));
}

#[test]
fn test_rerun_skips_created_rows() {
    let project = Project::new().with_sample_config();
    project.write("MOCK_ENDPOINTS.csv", MOCK_CSV);

    project.cmd(&["generate", "mock"]).assert().success();
    let fixture_before = project.read("out/mirage/fixtures/FooFixture.json");

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("mock: 0 created, 2 already created, 0 conflict(s) skipped, 0 failed")
                .and(predicate::str::contains("5 aggregate file(s) unchanged")),
        );
    assert_eq!(project.read("out/mirage/fixtures/FooFixture.json"), fixture_before);
}

#[test]
fn test_new_row_is_picked_up_on_rerun() {
    let project = Project::new().with_sample_config();
    project.write("MOCK_ENDPOINTS.csv", MOCK_CSV);
    project.cmd(&["generate", "mock"]).assert().success();

    let mut csv = project.read("MOCK_ENDPOINTS.csv");
    csv.push_str("Bar,/bar,bar,y,n,,,Get a bar,n\n");
    project.write("MOCK_ENDPOINTS.csv", &csv);

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mock: 1 created, 2 already created"));
    assert_eq!(
        project.read("out/mirage/fixtures/BarFixture.json").trim_end(),
        r#"{ "data": {} }"#
    );
    assert!(project.read("out/mirage/routes/index.js").contains("fixtures.BarFixture"));
}

#[test]
fn test_vue_generation_and_route_registry() {
    let project = Project::new().with_sample_config();
    project.write(
        "VUE_SCREENS.csv",
        "screen,directory,route,controller,description,created\n\
         Home,main,/home,none,Home page,n\n\
         Apply,jobs,/apply,Wizard,Apply for a job,n\n",
    );
    project.write("out/vue/src/router/routes.json", r#"{"Legacy": "/legacy"}"#);

    project
        .cmd(&["generate", "vue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 route(s) added to"));

    let view = project.read("out/vue/src/views/main/Home.ts");
    assert!(view.contains("export default class Home extends Vue"));
    assert!(view.contains("import { HomeDTO } from \"@/dto/main/HomeDTO\";"));
    assert!(view.contains("{{ dto.screenTitle }}"), "literal braces must survive: {}", view);
    assert!(project
        .read("out/vue/src/views/jobs/Apply.ts")
        .contains("TheWizardContainer"));
    assert!(project
        .read("out/vue/src/dto/main/HomeDTO.ts")
        .contains("public screenTitle = \"Home page\";"));
    assert!(project.path("out/vue/src/data/jobs/ApplyData.ts").exists());

    let written = project.read("out/vue/src/router/routes.json");
    let registry: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        registry,
        json!({ "Legacy": "/legacy", "Home": "/home", "Apply": "/apply" })
    );
    let keys: Vec<&str> = registry.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["Legacy", "Home", "Apply"]);
}

#[test]
fn test_vb_generation() {
    let project = Project::new().with_sample_config();
    project.write(
        "VB_SCREENS.csv",
        "screen,directory,route,isGet,args,created\nOrders,sales,/orders,y,\"id,customer\",n\n",
    );

    project.cmd(&["generate", "vb"]).assert().success();

    assert!(project
        .read("out/vb/sales/Helpers/OrdersHelper.vb")
        .contains("Public Class OrdersHelper"));
    assert!(project
        .read("out/vb/sales/HelperInterfaces/IOrdersHelper.vb")
        .contains("Public Interface IOrdersHelper"));
    let controller = project.read("out/vb/sales/Controllers/OrdersController.vb");
    assert!(controller.contains("<HttpGet>"));
    assert!(controller.contains("<RoutePrefix(\"api/orders\")>"));
    let model = project.read("out/vb/sales/Model/OrdersModel.vb");
    assert!(model.contains("Public Property id As String"));
    assert!(model.contains("Public Property customer As String"));
}

#[test]
fn test_bad_row_does_not_stop_the_batch() {
    let project = Project::new().with_sample_config();
    project.write(
        "MOCK_ENDPOINTS.csv",
        "name,route,response_sample\nGood,/good,\nBroken,/broken,{not json\nAlsoGood,/also,\n",
    );

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Failed rows:")
                .and(predicate::str::contains("Broken"))
                .and(predicate::str::contains("mock: 2 created, 0 already created, 0 conflict(s) skipped, 1 failed")),
        );
    assert!(project.path("out/mirage/fixtures/GoodFixture.json").exists());
    assert!(project.path("out/mirage/fixtures/AlsoGoodFixture.json").exists());
    assert!(!project.path("out/mirage/fixtures/BrokenFixture.json").exists());
}

#[test]
fn test_existing_file_is_not_overwritten_by_default() {
    let project = Project::new().with_sample_config();
    project.write("MOCK_ENDPOINTS.csv", "name,route\nFoo,/foo\n");
    project.write("out/mirage/fixtures/FooFixture.json", "keep me");

    project
        .cmd(&["generate", "mock"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Skipped rows (existing files):")
                .and(predicate::str::contains("Refusing to overwrite"))
                .and(predicate::str::contains("1 conflict(s) skipped, 0 failed")),
        );
    assert_eq!(project.read("out/mirage/fixtures/FooFixture.json"), "keep me");
    assert!(!project.read("MOCK_ENDPOINTS.csv").contains(",y"));

    project
        .cmd(&["generate", "mock", "--write-mode", "overwrite"])
        .assert()
        .success();
    assert_ne!(project.read("out/mirage/fixtures/FooFixture.json"), "keep me");
}

#[test]
fn test_dry_run_changes_nothing() {
    let project = Project::new().with_sample_config();
    let csv = "screen,directory,route\nHome,main,/home\n";
    project.write("VUE_SCREENS.csv", csv);

    project
        .cmd(&["generate", "vue", "--dry-run"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Would write")
                .and(predicate::str::contains("HomeDTO.ts"))
                .and(predicate::str::contains("Dry run: no files were changed.")),
        );
    assert!(!project.path("out").exists());
    assert_eq!(project.read("VUE_SCREENS.csv"), csv);
}

#[test]
fn test_csv_override() {
    let project = Project::new().with_sample_config();
    project.write("other.csv", "name\nOnly\n");

    let other = project.path("other.csv");
    project
        .cmd(&["generate", "mock", "--csv", other.to_str().unwrap()])
        .assert()
        .success();
    assert!(project.path("out/mirage/fixtures/OnlyFixture.json").exists());
}

#[test]
fn test_missing_option_fails_with_its_name() {
    let project = Project::new();
    project.write(
        "screengen.toml",
        "template_dir = \"templates\"\n[vue]\ncsv_file = \"VUE_SCREENS.csv\"\nbase_dir = \"src\"\n\
         router_config_dir = \"src/router\"\nrouter_config_name = \"routes\"\n",
    );

    project
        .cmd(&["generate", "vue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required option 'vue.dto_template'"));
}

#[test]
fn test_missing_csv_fails() {
    let project = Project::new().with_sample_config();

    project
        .cmd(&["generate", "vb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VB_SCREENS.csv"));
}

#[test]
fn test_unknown_config_key_fails() {
    let project = Project::new();
    project.write("screengen.toml", "template_dir = \"t\"\nunknown_option = 1\n");

    project
        .cmd(&["generate", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown_option"));
}

#[test]
fn test_broken_registry_fails_run() {
    let project = Project::new().with_sample_config();
    project.write("VUE_SCREENS.csv", "screen,directory,route\nHome,main,/home\n");
    project.write("out/vue/src/router/routes.json", "[]");

    project
        .cmd(&["generate", "vue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Route registry error"));
    assert!(!project.read("VUE_SCREENS.csv").contains(",y"));
}

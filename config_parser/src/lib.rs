pub mod internal;
pub mod raw;

#[test]
fn can_parse_the_example_file() {
    let demo_config_file = include_bytes!("../../webhook_handler_demo_config.yml");

    let config = crate::raw::ConfigFile::parse_from_reader(&demo_config_file[..]).unwrap();

    assert_eq!(config.version, crate::raw::ConfigVersion::V1_0Beta);
    assert_eq!(config.route.path, shared::constants::DEFAULT_ROUTE_PATH);
    assert_eq!(config.route.secret, "${{ env.WEBHOOK_SECRET }}");
}

use linechat::{Connection, ConnectionSettings, EchoServer, ReadOutcome};
use proptest::prelude::*;

/// Property-based tests for the line transport
#[cfg(test)]
mod property_tests {
    use super::*;

    fn echo_round_trip(lines: &[String]) -> Vec<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut server = EchoServer::new("127.0.0.1:0").await.unwrap();
            server.start().await.unwrap();
            let addr = server.get_bind_addr();

            let settings = ConnectionSettings::new(addr.ip().to_string(), addr.port());
            let (mut reader, mut writer) = Connection::connect(&settings).await.unwrap().into_split();

            let mut echoed = Vec::new();
            for line in lines {
                writer.write_line(line).await.unwrap();
                match reader.read_line().await {
                    ReadOutcome::Line(l) => echoed.push(l),
                    other => panic!("unexpected read outcome: {:?}", other),
                }
            }

            server.stop().await.unwrap();
            echoed
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_single_lines_survive_echo(lines in prop::collection::vec("[^\r\n]{1,64}", 1..8)) {
            let echoed = echo_round_trip(&lines);
            prop_assert_eq!(echoed, lines);
        }
    }
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_screenplay(episodes: u32, scenes_per_episode: u32) -> String {
    let mut content = String::new();

    for episode in 1..=episodes {
        content.push_str(&format!("# 第{episode}集\n\n"));
        for scene in 1..=scenes_per_episode {
            let flashback = scene % 7 == 0;
            if flashback {
                content.push_str("【闪回】\n");
            }
            let (time, kind) = if scene % 2 == 0 { ("夜", "外") } else { ("日", "内") };
            content.push_str(&format!("{episode}-{scene} {time} {kind} 场景{scene}\n"));
            content.push_str("人 张三 李四 王五\n");
            content.push_str("△ 李四推门进来，环顾四周。【标签：伏笔】\n");
            content.push_str("张三（低声）：你来晚了。\n");
            content.push_str("李四：路上出了点事，耽误了。\n");
            content.push_str("王五：先坐吧，慢慢说。\n\n");
            if flashback {
                content.push_str("【闪回结束】\n");
            }
        }
    }

    content
}

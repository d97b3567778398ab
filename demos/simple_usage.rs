//! typereg - 简化使用示例
//!
//! 展示封闭类型集合的声明、三种注册方式与递归解析。
//! 运行时设置 `RUST_LOG=typereg=debug` 可以看到槽位绑定日志。

use std::rc::Rc;

use typereg::{IntoService, Pipe, RegistryError, ServiceRegistry};

/// 示例配置
#[derive(Clone, Debug)]
struct Config {
    app_name: String,
    level: u8,
}

/// 日志接口
trait Log {
    fn log(&self, message: &str);
}

/// 控制台日志实现
struct ConsoleLogger {
    config: Config,
}

impl Log for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[{} L{}] {}", self.config.app_name, self.config.level, message);
    }
}

typereg::from_deps!(ConsoleLogger, |config: Config| ConsoleLogger { config });

impl IntoService<Rc<dyn Log>> for Rc<ConsoleLogger> {
    fn into_service(self) -> Rc<dyn Log> {
        self
    }
}

/// 依赖日志的业务服务
struct Greeter {
    logger: Rc<dyn Log>,
}

impl Greeter {
    fn greet(&self, name: &str) {
        self.logger.log(&format!("你好, {}!", name));
    }
}

typereg::from_deps!(Greeter, |logger: Rc<dyn Log>| Greeter { logger });

/// 每次解析都重新生成的请求编号
#[derive(Clone, Debug)]
struct RequestId(u64);

type Services = typereg::type_set![Config, Rc<dyn Log>, Greeter, RequestId];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🚀 typereg - 简化使用示例\n");

    let mut registry = ServiceRegistry::<Services>::new();

    println!("1️⃣ 未注册时解析失败，错误可辨识");
    match registry.resolve::<Config, _>() {
        Err(RegistryError::ServiceNotRegistered { service }) => {
            println!("   未注册: {}", service);
        }
        other => println!("   意外结果: {:?}", other),
    }

    println!("\n2️⃣ 注册固定实例（每次解析返回拷贝）");
    registry.register_instance(Config {
        app_name: "demo".to_string(),
        level: 3,
    });

    println!("3️⃣ 参数化注册：接口槽位绑定具体实现");
    registry
        .with_params::<(Config,), _>()
        .register_type::<Rc<dyn Log>, Rc<ConsoleLogger>, _>();
    registry
        .with_params::<(Rc<dyn Log>,), _>()
        .register_type::<Greeter, Greeter, _>();

    println!("4️⃣ 注册委托工厂（每次解析重新调用）");
    let counter = std::cell::Cell::new(0u64);
    registry.register_factory(move || {
        counter.set(counter.get() + 1);
        RequestId(counter.get())
    });

    println!("\n5️⃣ 解析并使用服务");
    let greeter = registry.resolve::<Greeter, _>()?;
    greeter.greet("世界");

    let first = registry.resolve::<RequestId, _>()?;
    let second = registry.resolve::<RequestId, _>()?;
    println!("   请求编号: {:?} -> {:?}", first, second);

    println!("\n6️⃣ 管道扩展");
    registry
        .resolve::<Config, _>()?
        .pipe(|config| println!("   配置级别翻倍: {}", config.level * 2));

    println!("\n✅ 示例完成！注册表状态: {:?}", registry);
    Ok(())
}

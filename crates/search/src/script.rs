//! Traditional/Simplified Chinese script folding.
//!
//! Matching folds both sides to Simplified script. Conversion goes through a
//! pluggable [`ScriptConverter`]; when none is available, or it fails, text
//! passes through unchanged.

use crate::error::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Chinese script variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Traditional,
    Simplified,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Script::Traditional => f.write_str("traditional"),
            Script::Simplified => f.write_str("simplified"),
        }
    }
}

/// A text converter between Chinese scripts.
pub trait ScriptConverter: Send + Sync {
    fn convert(&self, text: &str, from: Script, to: Script) -> Result<String>;
}

/// Character pairs, Traditional then Simplified.
const PAIRS: &[&str] = &[
    "萬万 與与 專专 業业 東东 絲丝 兩两 嚴严 喪丧 個个 豐丰 臨临 為为 麗丽 舉举 義义",
    "烏乌 樂乐 喬乔 習习 鄉乡 書书 買买 亂乱 爭争 於于 虧亏 雲云 亞亚 產产 畝亩 親亲",
    "億亿 僅仅 從从 侖仑 倉仓 儀仪 們们 價价 眾众 優优 夥伙 會会 傘伞 偉伟 傳传 傷伤",
    "倫伦 偽伪 體体 餘余 傭佣 僉佥 俠侠 侶侣 僥侥 偵侦 側侧 僑侨 儈侩 儂侬 俁俣 儉俭",
    "債债 傾倾 僂偻 僨偾 償偿 儲储 兒儿 兌兑 黨党 蘭兰 關关 興兴 茲兹 養养 獸兽 內内",
    "岡冈 冊册 寫写 軍军 農农 馮冯 衝冲 決决 況况 凍冻 淨净 涼凉 減减 湊凑 凜凛 幾几",
    "鳳凤 鳧凫 憑凭 凱凯 擊击 鑿凿 芻刍 劃划 劉刘 則则 剛刚 創创 刪删 別别 剗刬 劊刽",
    "劌刿 劍剑 劑剂 勸劝 辦办 務务 勱劢 動动 勵励 勁劲 勞劳 勢势 勳勋 勻匀 匭匦 匱匮",
    "區区 醫医 華华 協协 單单 賣卖 盧卢 鹵卤 衛卫 卻却 廠厂 廳厅 曆历 厲厉 壓压 厭厌",
    "廁厕 廂厢 廈厦 廚厨 縣县 參参 雙双 發发 變变 敘叙 疊叠 葉叶 號号 嘆叹 嘰叽 嚇吓",
    "呂吕 嗎吗 噸吨 聽听 啟启 吳吴 嘸呒 囈呓 嘔呕 嚦呖 唄呗 員员 咼呙 嗆呛 嗚呜 詠咏",
    "嚨咙 嚀咛 噝咝 響响 啞哑 噠哒 嘵哓 嗶哔 噦哕 嘩哗 噲哙 嚌哜 噥哝 喲哟 嘜唛 嘮唠",
    "嗩唢 喚唤 囀啭 嚙啮 嘯啸 噴喷 嘍喽 嚳喾 囁嗫 噯嗳 嘖啧 囑嘱 囪囱 團团 園园 圍围",
    "圖图 圓圆 聖圣 場场 壞坏 塊块 堅坚 壇坛 壩坝 塢坞 墳坟 墜坠 壟垄 壘垒 墾垦 堊垩",
    "埡垭 塏垲 壙圹 塒埘 堝埚 塹堑 墊垫 壺壶 壽寿 夠够 夢梦 頭头 誇夸 夾夹 奪夺 奮奋",
    "獎奖 奧奥 婦妇 媽妈 嫵妩 嫗妪 姍姗 婁娄 婭娅 嬈娆 嬌娇 孌娈 娛娱 媧娲 嫻娴 嬰婴",
    "嬋婵 嬸婶 媼媪 嬡嫒 嬪嫔 嬙嫱 孫孙 學学 孿孪 寧宁 寶宝 實实 寵宠 審审 憲宪 宮宫",
    "寬宽 賓宾 寢寝 對对 尋寻 導导 將将 爾尔 塵尘 堯尧 尷尴 屍尸 盡尽 層层 屜屉 屆届",
    "屬属 屢屡 屨屦 嶼屿 歲岁 豈岂 嶇岖 崗岗 峴岘 嶴岙 嵐岚 島岛 嶺岭 崠岽 巋岿 嶨峃",
    "嶧峄 峽峡 嶢峣 嶠峤 崢峥 巒峦 嶗崂 崍崃 嶮崄 嶄崭 嶸嵘 嶔嵚 嶁嵝 巔巅 鞏巩 幣币",
    "帥帅 師师 幃帏 帳帐 簾帘 幟帜 帶带 幀帧 幫帮 幬帱 幘帻 幗帼 冪幂 莊庄 慶庆 廬庐",
    "廡庑 庫库 應应 廟庙 龐庞 廢废 廩廪 開开 異异 棄弃 張张 彌弥 彎弯 彈弹 強强 歸归",
    "當当 錄录 彥彦 徹彻 徑径 徠徕 憶忆 懺忏 憂忧 愾忾 懷怀 態态 慫怂 憮怃 慪怄 悵怅",
    "愴怆 憐怜 總总 懟怼 懌怿 戀恋 懇恳 惡恶 慟恸 懨恹 愷恺 惻恻 惱恼 惲恽 悅悦 懸悬",
    "慳悭 憫悯 驚惊 懼惧 慘惨 懲惩 憊惫 愜惬 慚惭 憚惮 慣惯 願愿 懾慑 戇戆 戔戋 戲戏",
    "戧戗 戰战 戩戬 戶户 紮扎 撲扑 執执 擴扩 捫扪 掃扫 揚扬 擾扰 撫抚 拋抛 摶抟 摳抠",
    "掄抡 搶抢 護护 報报 擔担 擬拟 攏拢 揀拣 擁拥 攔拦 擰拧 撥拨 擇择 掛挂 摯挚 攣挛",
    "撾挝 撻挞 挾挟 撓挠 擋挡 撟挢 掙挣 擠挤 揮挥 撈捞 損损 撿捡 換换 搗捣 據据 擄掳",
    "摑掴 擲掷 撣掸 摻掺 摜掼 攬揽 搵揾 撳揿 攙搀 擱搁 摟搂 攪搅 攜携 攝摄 攄摅 擺摆",
    "搖摇 擯摈 攤摊 攖撄 撐撑 攆撵 擷撷 擼撸 攛撺 擻擞 攢攒 敵敌 斂敛 數数 齋斋 斕斓",
    "鬥斗 斬斩 斷断 無无 舊旧 時时 曠旷 暘旸 曇昙 晝昼 顯显 晉晋 曬晒 曉晓 曄晔 暈晕",
    "暉晖 暫暂 曖暧 術术 樸朴 機机 殺杀 雜杂 權权 條条 來来 楊杨 榪杩 傑杰 極极 構构",
    "樅枞 樞枢 棗枣 櫪枥 梘枧 棖枨 槍枪 楓枫 梟枭 櫃柜 檸柠 檉柽 梔栀 柵栅 標标 棧栈",
    "櫛栉 櫳栊 棟栋 櫨栌 櫟栎 欄栏 樹树 棲栖 樣样 欒栾 椏桠 橈桡 楨桢 檔档 榿桤 橋桥",
    "樺桦 檜桧 槳桨 樁桩 檢检 欞棂 槨椁 櫝椟 槧椠 樓楼 欖榄 櫬榇 櫚榈 櫸榉 檟槚 檻槛",
    "檳槟 櫧槠 歡欢 歐欧 殲歼 歿殁 殤殇 殘残 殞殒 殮殓 殫殚 殯殡 毆殴 毀毁 轂毂 畢毕",
    "斃毙 氈毡 毿毵 氌氇 氣气 氫氢 氬氩 氳氲 匯汇 漢汉 湯汤 洶汹 溝沟 沒没 灃沣 漚沤",
    "瀝沥 淪沦 滄沧 潙沩 滬沪 濘泞 淚泪 潑泼 澤泽 涇泾 潔洁 灑洒 窪洼 浹浃 淺浅 漿浆",
    "澆浇 湞浈 濁浊 測测 澮浍 濟济 瀏浏 渾浑 滸浒 濃浓 潯浔 濤涛 澇涝 漣涟 淶涞 漬渍",
    "濱滨 漲涨 澀涩 澱淀 漁渔 潷滗 滌涤 漸渐 潛潜 瀦潴 溫温 灣湾 濕湿 潰溃 濺溅 滯滞",
    "滲渗 滷卤 滾滚 滿满 瀅滢 濾滤 濫滥 灤滦 灘滩 澦滪 瀠潆 瀟潇 瀲潋 潤润 澗涧 澠渑",
    "灧滟 燈灯 靈灵 災灾 燦灿 煬炀 爐炉 燉炖 煒炜 熗炝 點点 煉炼 熾炽 爍烁 爛烂 烴烃",
    "燭烛 煙烟 煩烦 燒烧 燁烨 燴烩 燙烫 燼烬 熱热 煥焕 燜焖 燾焘 營营 愛爱 爺爷 牘牍",
    "牽牵 犧牺 犢犊 狀状 獷犷 獁犸 猶犹 狽狈 猙狰 獨独 狹狭 獅狮 獪狯 猻狲 獄狱 獰狞",
    "獵猎 獼猕 玀猡 豬猪 貓猫 獻献 獺獭 璣玑 瑪玛 瑋玮 環环 現现 璽玺 瓏珑 琺珐 琿珲",
    "璉琏 瑣琐 瓊琼 瑤瑶 璦瑷 瓔璎 瓚瓒 甌瓯 電电 畫画 暢畅 疇畴 癤疖 療疗 瘧疟 癘疠",
    "瘍疡 瘡疮 瘋疯 皰疱 癰痈 痙痉 癢痒 瘂痖 癆痨 瘓痪 癇痫 癡痴 癱瘫 癮瘾 癭瘿 癲癫",
    "皚皑 皺皱 盜盗 盞盏 監监 盤盘 眥眦 睜睁 瞞瞒 瞼睑 矚瞩 矯矫 礬矾 礦矿 碭砀 碼码",
    "磚砖 硨砗 硯砚 碸砜 礪砺 礱砻 礫砾 礎础 碩硕 硤硖 確确 礙碍 磧碛 磣碜 禮礼 禱祷",
    "禍祸 禎祯 離离 禿秃 稈秆 種种 積积 稱称 穢秽 穩稳 穌稣 窮穷 竊窃 竅窍 窯窑 竄窜",
    "窩窝 窺窥 竇窦 豎竖 競竞 筆笔 筍笋 箋笺 籠笼 篩筛 築筑 篤笃 簡简 籌筹 簽签 簫箫",
    "籃篮 籬篱 糴籴 類类 糧粮 糝糁 緊紧 縈萦 繫系 糾纠 紀纪 紉纫 約约 紅红 紆纡 紇纥",
    "紈纨 紋纹 納纳 紐纽 紓纾 純纯 紕纰 紗纱 紙纸 級级 紛纷 紜纭 紡纺 細细 紳绅 紹绍",
    "紺绀 終终 組组 絆绊 絃弦 經经 綁绑 絨绒 結结 絝绔 繞绕 絰绖 給给 絢绚 絳绛 絡络",
    "絕绝 絞绞 統统 綆绠 綃绡 絹绢 繡绣 綏绥 繼继 綈绨 續续 綺绮 緒绪 綾绫 緋绯 綽绰",
    "綢绸 綜综 綻绽 綠绿 綴缀 緇缁 線线 緝缉 緞缎 締缔 緣缘 編编 緩缓 緬缅 緯纬 練练",
    "緘缄 緻致 縛缚 縝缜 縟缛 縉缙 縫缝 縮缩 繆缪 繃绷 縷缕 縹缥 織织 繕缮 繒缯 繩绳",
    "繪绘 繹绎 繳缴 纜缆 罰罚 罷罢 羅罗 罵骂 羈羁 羋芈 翹翘 聯联 聰聪 聲声 聳耸 職职",
    "聶聂 肅肃 腸肠 膚肤 腎肾 腫肿 脹胀 脅胁 膽胆 勝胜 朧胧 臍脐 腦脑 膿脓 臠脔 腳脚",
    "脫脱 臉脸 膠胶 臘腊 膩腻 騰腾 臚胪 艙舱 艦舰 艱艰 艷艳 藝艺 節节 蘆芦 蘇苏 蘋苹",
    "範范 莖茎 薦荐 莢荚 蕘荛 蓽荜 蕎荞 薈荟 藎荩 蕁荨 藥药 萊莱 蓮莲 蒔莳 萵莴 獲获",
    "瑩莹 鶯莺 蒓莼 蘿萝 螢萤 蕭萧 薩萨 蔥葱 蕆蒇 蕢蒉 蔣蒋 蔞蒌 藍蓝 薊蓟 蘺蓠 蕷蓣",
    "驀蓦 蘚藓 蘊蕴 藪薮 藹蔼 虜虏 慮虑 蟲虫 蝦虾 雖虽 螞蚂 蠶蚕 蠔蚝 蝕蚀 蟻蚁 蟄蛰",
    "蠣蛎 蠱蛊 蠍蝎 螻蝼 蟶蛏 蠅蝇 蠐蛴 蠟蜡 蠻蛮 蠑蝾 蟈蝈 補补 襯衬 袞衮 襖袄 裊袅",
    "褲裤 襪袜 製制 複复 褸褛 褻亵 襤褴 襠裆 襝裣 見见 觀观 規规 覓觅 視视 覘觇 覽览",
    "覺觉 覬觊 覯觏 覲觐 覷觑 觴觞 觸触 訁讠 計计 訂订 訃讣 認认 譏讥 訐讦 訌讧 討讨",
    "讓让 訕讪 訖讫 訓训 議议 訊讯 記记 講讲 諱讳 謳讴 訝讶 訥讷 許许 訛讹 論论 訟讼",
    "諷讽 設设 訪访 訣诀 證证 詁诂 訶诃 評评 詛诅 識识 詐诈 訴诉 診诊 詆诋 謅诌 詞词",
    "譯译 詒诒 誆诓 誄诔 試试 詿诖 詩诗 詰诘 誠诚 話话 誕诞 詭诡 詢询 該该 詳详 詫诧",
    "諢诨 誅诛 誌志 誑诳 說说 誦诵 誘诱 語语 誤误 誥诰 誨诲 課课 誰谁 調调 諂谄 諒谅",
    "談谈 請请 諸诸 諾诺 謀谋 謁谒 謂谓 諜谍 謊谎 諫谏 諧谐 謎谜 謗谤 謙谦 謝谢 謠谣",
    "謹谨 謬谬 譜谱 譴谴 譽誉 讀读 貝贝 貞贞 負负 貢贡 財财 責责 賢贤 敗败 賬账 貨货",
    "質质 販贩 貪贪 貧贫 貶贬 購购 貯贮 貫贯 貳贰 賤贱 賁贲 貸贷 費费 賀贺 貽贻 貿贸",
    "資资 賈贾 賄贿 賃赁 賂赂 賊贼 賑赈 賒赊 賠赔 賜赐 賞赏 賦赋 賭赌 賴赖 賺赚 賽赛",
    "贈赠 贊赞 贏赢 贖赎 贓赃 贛赣 趙赵 趕赶 趨趋 躍跃 蹌跄 跡迹 踐践 蹺跷 蹤踪 躊踌",
    "躉趸 軀躯 車车 軋轧 軌轨 軒轩 轉转 輪轮 軟软 轟轰 軸轴 輕轻 載载 轎轿 較较 輔辅",
    "輛辆 輝辉 輩辈 輸输 轄辖 轅辕 輾辗 轍辙 辭辞 辯辩 遼辽 達达 遷迁 過过 邁迈 運运",
    "還还 這这 進进 遠远 違违 連连 遲迟 邇迩 適适 選选 遜逊 遞递 邏逻 遺遗 鄧邓 鄰邻",
    "鄭郑 鄒邹 鄲郸 醞酝 醬酱 釀酿 釋释 裏里 鑒鉴 針针 釘钉 釣钓 鈍钝 鈔钞 鈣钙 鈉钠",
    "鈞钧 鈕钮 鈴铃 鉛铅 鉤钩 鉗钳 鉅钜 銀银 銅铜 銘铭 銳锐 銷销 鋒锋 鋼钢 錢钱 錦锦",
    "錫锡 錯错 錨锚 鍊链 鍋锅 鍵键 鍍镀 鎖锁 鎮镇 鏡镜 鐘钟 鐵铁 鑄铸 鑰钥 鑽钻 長长",
    "門门 閃闪 閉闭 問问 閒闲 間间 閣阁 閥阀 閱阅 闊阔 闆板 闖闯 闡阐 闢辟 隊队 陽阳",
    "陰阴 陣阵 階阶 際际 陸陆 陳陈 險险 隱隐 隨随 隸隶 難难 雛雏 雞鸡 霧雾 靜静 靂雳",
    "韋韦 韓韩 頁页 頂顶 項项 順顺 須须 預预 領领 頗颇 頻频 題题 額额 顏颜 顧顾 風风",
    "颱台 飛飞 飢饥 飯饭 飲饮 飽饱 飾饰 餅饼 館馆 饒饶 馬马 駐驻 駕驾 駛驶 騎骑 騙骗",
    "驗验 驅驱 驟骤 髮发 鬧闹 魚鱼 鮮鲜 鯨鲸 鳥鸟 鳴鸣 鴻鸿 鵝鹅 鷹鹰 鹽盐 麥麦 黃黄",
    "齊齐 齒齿 龍龙 龜龟 臺台 檯台 後后 裡里 麼么 乾干 幹干 係系 隻只 著着 歷历 髒脏",
    "礮炮 砲炮 備备 駁驳 處处 廣广",
];

/// Simplified characters that must not be mapped back: they stand for more
/// than one Traditional character, or are themselves valid Traditional.
const REVERSE_SKIP: &str = "后么斗只着余面";

static T2S: Lazy<HashMap<char, char>> = Lazy::new(|| {
    PAIRS
        .iter()
        .flat_map(|line| line.split_whitespace())
        .filter_map(|pair| {
            let mut chars = pair.chars();
            Some((chars.next()?, chars.next()?))
        })
        .collect()
});

static S2T: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for simplified in T2S.values() {
        *counts.entry(*simplified).or_default() += 1;
    }
    T2S.iter()
        .filter(|(_, s)| counts.get(*s) == Some(&1) && !REVERSE_SKIP.contains(**s))
        .map(|(t, s)| (*s, *t))
        .collect()
});

/// Built-in character-level converter.
///
/// Covers common characters only; phrase-level conversion needs an external
/// converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTableConverter;

impl CharTableConverter {
    fn map_chars(text: &str, table: &HashMap<char, char>) -> String {
        text.chars().map(|c| table.get(&c).copied().unwrap_or(c)).collect()
    }
}

impl ScriptConverter for CharTableConverter {
    fn convert(&self, text: &str, from: Script, to: Script) -> Result<String> {
        Ok(match (from, to) {
            (Script::Traditional, Script::Simplified) => Self::map_chars(text, &T2S),
            (Script::Simplified, Script::Traditional) => Self::map_chars(text, &S2T),
            _ => text.to_string(),
        })
    }
}

/// Script folding with identity fallback.
#[derive(Clone)]
pub struct ScriptFolder {
    converter: Option<Arc<dyn ScriptConverter>>,
}

impl fmt::Debug for ScriptFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFolder")
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

impl Default for ScriptFolder {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScriptFolder {
    /// Use `converter`, or pass text through unchanged when `None`.
    pub fn new(converter: Option<Arc<dyn ScriptConverter>>) -> Self {
        if converter.is_none() {
            warn!("No script converter available, Traditional/Simplified folding disabled");
        }
        Self { converter }
    }

    /// Folder backed by the built-in character table.
    pub fn builtin() -> Self {
        Self {
            converter: Some(Arc::new(CharTableConverter)),
        }
    }

    /// Folder that never converts.
    pub fn identity() -> Self {
        Self { converter: None }
    }

    pub fn is_ready(&self) -> bool {
        self.converter.is_some()
    }

    fn convert(&self, text: &str, from: Script, to: Script) -> String {
        let Some(converter) = &self.converter else {
            return text.to_string();
        };
        match converter.convert(text, from, to) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(error = %e, %from, %to, "Script conversion failed, using original text");
                text.to_string()
            }
        }
    }

    pub fn to_simplified(&self, text: &str) -> String {
        self.convert(text, Script::Traditional, Script::Simplified)
    }

    pub fn to_traditional(&self, text: &str) -> String {
        self.convert(text, Script::Simplified, Script::Traditional)
    }

    /// Comparison form: every character lower-cased, then Simplified.
    ///
    /// Characters are folded one at a time, so the folded text lines up with
    /// the original and a match in it maps back to whole source characters.
    pub fn fold(&self, text: &str) -> String {
        let mut folded = String::with_capacity(text.len());
        let mut buf = [0u8; 4];
        for c in text.chars() {
            if c.is_ascii() {
                folded.push(c.to_ascii_lowercase());
            } else {
                let lower = c.encode_utf8(&mut buf).to_lowercase();
                folded.push_str(&self.to_simplified(&lower));
            }
        }
        folded
    }
}

static DEFAULT_FOLDER: Lazy<ScriptFolder> = Lazy::new(ScriptFolder::builtin);

/// Traditional to Simplified with the built-in table.
pub fn to_simplified(text: &str) -> String {
    DEFAULT_FOLDER.to_simplified(text)
}

/// Simplified to Traditional with the built-in table.
pub fn to_traditional(text: &str) -> String {
    DEFAULT_FOLDER.to_traditional(text)
}
